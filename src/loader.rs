//! Loads a raw program binary into instruction memory.
//!
//! Programs are a flat sequence of big-endian 32-bit words, packed
//! directly from the file's bytes with no container format (no ELF, no
//! header). This is the only place the simulator touches the
//! filesystem, and the only failure that propagates out of the core is
//! the file failing to open.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::LoaderError;
use crate::memory::{InstructionMemory, INSTR_MEM_SIZE};

/// Reads `path` and assembles its bytes into instruction words,
/// big-endian, four bytes per word. If the file's length is not a
/// multiple of four, the trailing partial word is left-shifted to fill
/// the missing low-order bytes with zero. Stops (with a diagnostic) once
/// `INSTR_MEM_SIZE` instructions have been assembled, discarding any
/// remaining bytes.
pub fn load_program(path: &Path) -> Result<InstructionMemory, LoaderError> {
    let bytes = fs::read(path).map_err(|e| LoaderError::FileOpen(path.to_path_buf(), e))?;

    let mut words = Vec::with_capacity(bytes.len() / 4 + 1);
    let mut word: u32 = 0;
    let mut byte_count = 0usize;

    for &byte in &bytes {
        if words.len() >= INSTR_MEM_SIZE {
            warn!("instruction memory overflow, too many instructions");
            break;
        }

        word = (word << 8) | byte as u32;
        byte_count += 1;
        if byte_count % 4 == 0 {
            words.push(word);
            word = 0;
        }
    }

    if byte_count % 4 != 0 && words.len() < INSTR_MEM_SIZE {
        while byte_count % 4 != 0 {
            word <<= 8;
            byte_count += 1;
        }
        words.push(word);
    }

    Ok(InstructionMemory::from_words(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(bytes: &[u8], tag: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!("mips_sim_loader_test_{}_{}", std::process::id(), tag));
            fs::write(&path, bytes).unwrap();
            TempFile(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_loads_whole_words_big_endian() {
        let file = TempFile::new(&[0x00, 0x00, 0x00, 0x01, 0xFF, 0x00, 0x00, 0x00], "whole_words");
        let mem = load_program(&file.0).unwrap();
        assert_eq!(mem.read(0), 0x0000_0001);
        assert_eq!(mem.read(1), 0xFF00_0000);
        assert_eq!(mem.loaded_count(), 2);
    }

    #[test]
    fn test_pads_trailing_partial_word() {
        let file = TempFile::new(&[0xAB, 0xCD], "partial_word");
        let mem = load_program(&file.0).unwrap();
        assert_eq!(mem.read(0), 0xABCD_0000);
        assert_eq!(mem.loaded_count(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_program(Path::new("/nonexistent/path/to/a/program.bin"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_file_loads_nothing() {
        let file = TempFile::new(&[], "empty");
        let mem = load_program(&file.0).unwrap();
        assert_eq!(mem.loaded_count(), 0);
    }
}
