//! CRC16/XMODEM checksum shared by both frame types

const POLYNOMIAL: u16 = 0x1021;

/// CRC16/XMODEM: polynomial 0x1021, initial value 0, MSB first, no final XOR
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
