//! CRC16-CCITT, matching the checksum the telemetry runtime exchanges during its handshake

const POLYNOMIAL: u16 = 0x1021;

pub const CRC16_INIT: u16 = 0xffff;

pub fn crc16(mut crc: u16, byte: u8) -> u16 {
    crc ^= (byte as u16) << 8;
    for _ in 0..8 {
        crc = match crc & 0x8000 {
            0 => crc << 1,
            _ => (crc << 1) ^ POLYNOMIAL,
        };
    }
    crc
}

pub fn crc16_bytes(bytes: &[u8]) -> u16 {
    bytes.iter().fold(CRC16_INIT, |crc, &byte| crc16(crc, byte))
}
