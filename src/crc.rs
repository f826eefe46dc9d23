const POLYNOMIAL: u8 = 0x31;
const INIT: u8 = 0xFF;

/// CRC-8 lookup table for polynomial 0x31, built at compile time.
static TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x80 == 0 {
                crc <<= 1;
            } else {
                crc = (crc << 1) ^ POLYNOMIAL;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Sensirion CRC-8 (poly 0x31, init 0xFF, no reflection, xor-out 0x00).
pub fn crc(data: &[u8]) -> u8 {
    data.iter()
        .fold(INIT, |crc, &byte| TABLE[usize::from(crc ^ byte)])
}
