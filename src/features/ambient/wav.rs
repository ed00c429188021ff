//! Minimal 16-bit PCM WAV export.

use std::io::Write;
use std::path::Path;

use crate::error::FocusError;

const HEADER_LEN: u32 = 44;

/// Encode mono samples as a 16-bit PCM WAV file image.
///
/// # Errors
///
/// Returns `FocusError::Audio` if the byte rate or data size does not fit
/// the 32-bit header fields.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, FocusError> {
    let byte_rate = sample_rate.checked_mul(2).ok_or_else(|| {
        FocusError::Audio(format!("Sample rate {sample_rate} is too high for WAV"))
    })?;
    let data_len = samples
        .len()
        .checked_mul(2)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(HEADER_LEN).is_some())
        .ok_or_else(|| {
            FocusError::Audio(format!("{} samples do not fit in a WAV file", samples.len()))
        })?;
    let mut out = Vec::with_capacity(HEADER_LEN as usize + data_len as usize);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        out.extend_from_slice(&v.to_le_bytes());
    }
    Ok(out)
}

/// Write mono samples to `path` as a WAV file.
///
/// # Errors
///
/// Returns `FocusError::Audio` if the file cannot be written.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), FocusError> {
    let bytes = encode_wav(samples, sample_rate)?;
    let mut file = std::fs::File::create(path)
        .map_err(|e| FocusError::Audio(format!("Failed to create {}: {e}", path.display())))?;
    file.write_all(&bytes)
        .map_err(|e| FocusError::Audio(format!("Failed to write {}: {e}", path.display())))?;
    log::info!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_layout() {
        let bytes = encode_wav(&[0.0, 1.0, -1.0], 8000).unwrap();
        assert_eq!(bytes.len(), 44 + 6);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 42);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(
            u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            8000
        );
        assert_eq!(i16::from_le_bytes([bytes[46], bytes[47]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([bytes[48], bytes[49]]), -i16::MAX);
    }

    #[test]
    fn test_oversized_sample_rate_rejected() {
        let result = encode_wav(&[0.0], 3_000_000_000);
        assert!(matches!(result, Err(FocusError::Audio(_))));
    }

    #[test]
    fn test_write_wav_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, &[0.25; 100], 44_100).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 44 + 200);
    }

    #[test]
    fn test_write_wav_bad_path() {
        let path = Path::new("/definitely/not/here/tone.wav");
        assert!(matches!(
            write_wav(path, &[0.0], 8000),
            Err(FocusError::Audio(_))
        ));
    }
}
