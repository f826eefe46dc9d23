//! Decoding of SPS30 responses.
//!
//! Responses are sequences of `[data, data, checksum]` groups. 32-bit values
//! span two groups (6 raw bytes carrying 4 data bytes, big endian).

use crate::commands::{DATA_READY_LEN, FIRMWARE_VERSION_LEN, MEASUREMENT_LEN};
use crate::crc::crc;
use crate::error::ProtocolError;
use crate::types::{AirQualityReading, DataReady, DeviceString, FirmwareVersion};

/// Raw bytes carrying one 32-bit value.
pub const WORD_PAIR_LEN: usize = 6;

pub const MASS_PM1_0_OFFSET: usize = 0;
pub const MASS_PM2_5_OFFSET: usize = 6;
pub const MASS_PM4_0_OFFSET: usize = 12;
pub const MASS_PM10_0_OFFSET: usize = 18;
pub const NUMBER_PM0_5_OFFSET: usize = 24;
pub const NUMBER_PM1_0_OFFSET: usize = 30;
pub const NUMBER_PM2_5_OFFSET: usize = 36;
pub const NUMBER_PM4_0_OFFSET: usize = 42;
pub const NUMBER_PM10_0_OFFSET: usize = 48;
pub const TYPICAL_PARTICLE_SIZE_OFFSET: usize = 54;

type Field = fn(&mut AirQualityReading) -> &mut f32;

const MEASUREMENT_LAYOUT: [(usize, Field); 10] = [
    (MASS_PM1_0_OFFSET, |r| &mut r.mass_pm1_0),
    (MASS_PM2_5_OFFSET, |r| &mut r.mass_pm2_5),
    (MASS_PM4_0_OFFSET, |r| &mut r.mass_pm4_0),
    (MASS_PM10_0_OFFSET, |r| &mut r.mass_pm10_0),
    (NUMBER_PM0_5_OFFSET, |r| &mut r.number_pm0_5),
    (NUMBER_PM1_0_OFFSET, |r| &mut r.number_pm1_0),
    (NUMBER_PM2_5_OFFSET, |r| &mut r.number_pm2_5),
    (NUMBER_PM4_0_OFFSET, |r| &mut r.number_pm4_0),
    (NUMBER_PM10_0_OFFSET, |r| &mut r.number_pm10_0),
    (TYPICAL_PARTICLE_SIZE_OFFSET, |r| &mut r.typical_particle_size),
];

/// Where an identity string ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// First zero byte, or the end of the buffer.
    Nul,
    /// End of the buffer.
    End,
}

fn ensure_len(raw: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if raw.len() < expected {
        return Err(ProtocolError::ShortResponse {
            expected,
            actual: raw.len(),
        });
    }
    Ok(())
}

fn data_bytes(raw: &[u8]) -> Result<[u8; 4], ProtocolError> {
    ensure_len(raw, WORD_PAIR_LEN)?;
    Ok([raw[0], raw[1], raw[3], raw[4]])
}

/// Decodes a big endian `u32` from the first 6 raw bytes, skipping the
/// checksum bytes at index 2 and 5.
pub fn decode_u32(raw: &[u8]) -> Result<u32, ProtocolError> {
    let [b0, b1, b3, b4] = data_bytes(raw)?;
    Ok(u32::from(b4) | (u32::from(b3) << 8) | (u32::from(b1) << 16) | (u32::from(b0) << 24))
}

/// Decodes a big endian IEEE754 `f32` from the first 6 raw bytes.
pub fn decode_f32(raw: &[u8]) -> Result<f32, ProtocolError> {
    Ok(f32::from_bits(u32::from_be_bytes(data_bytes(raw)?)))
}

/// Collects the data bytes of an identity string, dropping every byte at an
/// index `i % 3 == 2`.
///
/// With `Terminator::Nul` a zero byte at any index ends the string, checksum
/// positions included. The scan runs up to and including `raw.len()`; that
/// final index is past the buffer and ends the scan like a terminator.
pub fn decode_ascii(raw: &[u8], terminator: Terminator) -> DeviceString {
    let mut out = DeviceString::new();
    for i in 0..=raw.len() {
        let Some(&byte) = raw.get(i) else {
            break;
        };
        if terminator == Terminator::Nul && byte == 0 {
            break;
        }
        if i % 3 != 2 && out.push(byte).is_err() {
            break;
        }
    }
    out
}

pub fn decode_measurement(raw: &[u8]) -> Result<AirQualityReading, ProtocolError> {
    ensure_len(raw, MEASUREMENT_LEN)?;
    let mut reading = AirQualityReading::default();
    for (offset, field) in MEASUREMENT_LAYOUT {
        *field(&mut reading) = decode_f32(&raw[offset..])?;
    }
    Ok(reading)
}

pub fn decode_data_ready(raw: &[u8]) -> Result<DataReady, ProtocolError> {
    ensure_len(raw, DATA_READY_LEN)?;
    Ok(if raw[1] == 0x01 {
        DataReady::Ready
    } else {
        DataReady::NotReady
    })
}

pub fn decode_firmware_version(raw: &[u8]) -> Result<FirmwareVersion, ProtocolError> {
    ensure_len(raw, FIRMWARE_VERSION_LEN)?;
    Ok(FirmwareVersion {
        major: raw[0],
        minor: raw[1],
    })
}

/// Checks every complete `[data, data, checksum]` group. Trailing bytes that
/// do not form a full group are not checked.
pub fn verify_checksums(raw: &[u8]) -> Result<(), ProtocolError> {
    for (n, group) in raw.chunks_exact(3).enumerate() {
        if crc(&group[..2]) != group[2] {
            return Err(ProtocolError::ChecksumMismatch { offset: n * 3 + 2 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interleave(value: [u8; 4], checksums: [u8; 2]) -> [u8; 6] {
        [
            value[0],
            value[1],
            checksums[0],
            value[2],
            value[3],
            checksums[1],
        ]
    }

    fn with_crc(value: [u8; 4]) -> [u8; 6] {
        interleave(value, [crc(&value[..2]), crc(&value[2..])])
    }

    #[test]
    fn checksum_bytes_are_ignored() {
        let values = [
            [0x00, 0x00, 0x00, 0x00],
            [0xFF, 0xFF, 0xFF, 0xFF],
            [0xAA, 0x55, 0xAA, 0x55],
            [0x55, 0xAA, 0x55, 0xAA],
            [0x01, 0x02, 0x03, 0x04],
            [0xDE, 0xAD, 0xBE, 0xEF],
        ];
        for value in values {
            for checksums in [[0x00, 0x00], [0xFF, 0xFF], [0x12, 0x34]] {
                let raw = interleave(value, checksums);
                assert_eq!(decode_u32(&raw).unwrap(), u32::from_be_bytes(value));
                assert_eq!(
                    decode_f32(&raw).unwrap().to_bits(),
                    u32::from_be_bytes(value)
                );
            }
        }
    }

    #[test]
    fn u32_skips_index_two() {
        let raw = [0x00, 0xAA, 0xBB, 0x01, 0x02, 0x03];
        assert_eq!(
            decode_u32(&raw).unwrap(),
            (0x00 << 24) | (0xAA << 16) | (0x01 << 8) | 0x02
        );
    }

    #[test]
    fn float_is_big_endian() {
        let raw = with_crc(12.5f32.to_be_bytes());
        assert_eq!(raw, [0x41, 0x48, 0x78, 0x00, 0x00, 0x81]);
        assert_eq!(decode_f32(&raw).unwrap(), 12.5);
    }

    #[test]
    fn nan_is_passed_through() {
        let raw = with_crc(f32::NAN.to_be_bytes());
        assert!(decode_f32(&raw).unwrap().is_nan());
    }

    #[test]
    fn short_word_pair() {
        assert_eq!(
            decode_u32(&[0x00, 0x01, 0x02, 0x03, 0x04]),
            Err(ProtocolError::ShortResponse {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn measurement_fields() {
        let values = [
            12.5, 13.0, 14.25, 15.5, 1.0, 2.0, 3.5, 4.75, 5.125, 0.625f32,
        ];
        let mut raw = [0u8; MEASUREMENT_LEN];
        for (group, value) in raw.chunks_exact_mut(WORD_PAIR_LEN).zip(values) {
            group.copy_from_slice(&with_crc(value.to_be_bytes()));
        }
        let reading = decode_measurement(&raw).unwrap();
        assert_eq!(reading.mass_pm1_0, 12.5);
        assert_eq!(reading.mass_pm2_5, 13.0);
        assert_eq!(reading.mass_pm4_0, 14.25);
        assert_eq!(reading.mass_pm10_0, 15.5);
        assert_eq!(reading.number_pm0_5, 1.0);
        assert_eq!(reading.number_pm1_0, 2.0);
        assert_eq!(reading.number_pm2_5, 3.5);
        assert_eq!(reading.number_pm4_0, 4.75);
        assert_eq!(reading.number_pm10_0, 5.125);
        assert_eq!(reading.typical_particle_size, 0.625);
    }

    #[test]
    fn short_measurement() {
        assert_eq!(
            decode_measurement(&[0u8; 59]),
            Err(ProtocolError::ShortResponse {
                expected: 60,
                actual: 59
            })
        );
    }

    #[test]
    fn article_code_stops_at_nul() {
        let mut raw = [0u8; 47];
        raw[..6].copy_from_slice(&[b'0', b'0', 0x11, b'0', b'8', 0x22]);
        raw[6] = 0;
        raw[7] = b'X';
        let code = decode_ascii(&raw, Terminator::Nul);
        assert_eq!(code.as_bytes(), b"0008");
    }

    #[test]
    fn nul_in_checksum_position_terminates() {
        let raw = [b'A', b'B', 0x00, b'C', b'D', 0x33];
        assert_eq!(decode_ascii(&raw, Terminator::Nul).as_bytes(), b"AB");
    }

    #[test]
    fn pair_with_zero_crc_cuts_article_code() {
        assert_eq!(crc(b"0i"), 0x00);
        let raw = [b'A', b'B', crc(b"AB"), b'0', b'i', crc(b"0i"), b'C', b'D', crc(b"CD")];
        assert_eq!(decode_ascii(&raw, Terminator::Nul).as_bytes(), b"AB0i");
        assert_eq!(decode_ascii(&raw, Terminator::End).as_bytes(), b"AB0iCD");
    }

    #[test]
    fn article_code_without_nul_runs_to_buffer_end() {
        let mut raw = [0u8; 47];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = if i % 3 == 2 { 0xEE } else { b'A' + (i % 26) as u8 };
        }
        let code = decode_ascii(&raw, Terminator::Nul);
        assert_eq!(code.len(), 32);
        assert_eq!(code.as_bytes()[31], raw[46]);
    }

    #[test]
    fn serial_keeps_every_data_byte() {
        let raw = [b'1', b'2', 0x00, 0x00, b'3', 0x99, b'4'];
        assert_eq!(
            decode_ascii(&raw, Terminator::End).as_bytes(),
            &[b'1', b'2', 0x00, b'3', b'4']
        );
    }

    #[test]
    fn data_ready_flag() {
        assert_eq!(decode_data_ready(&[0x00, 0x01, 0x00]), Ok(DataReady::Ready));
        assert_eq!(
            decode_data_ready(&[0x00, 0x00, 0x00]),
            Ok(DataReady::NotReady)
        );
        assert!(decode_data_ready(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn checksum_verification() {
        let good = with_crc([0x41, 0x48, 0x00, 0x00]);
        assert_eq!(verify_checksums(&good), Ok(()));

        let mut bad = good;
        bad[5] ^= 0x01;
        assert_eq!(
            verify_checksums(&bad),
            Err(ProtocolError::ChecksumMismatch { offset: 5 })
        );

        // incomplete trailing group is left alone
        assert_eq!(verify_checksums(&[0x00, 0x00, 0x81, 0x12, 0x34]), Ok(()));
    }
}
