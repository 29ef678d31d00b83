use crate::error::StoreError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// size of the counter image, a little-endian u32
const IMAGE_LEN: usize = 4;

/// what a freshly erased EEPROM cell reads back as
const ERASED_BYTE: u8 = 0xff;

/// A single integer that survives power loss.
pub trait PersistentCounter {
    /// `None` when nothing (valid) has ever been written
    fn read(&mut self) -> Result<Option<u32>, StoreError>;

    /// must not return until the value is durable
    fn write(&mut self, value: u32) -> Result<(), StoreError>;
}

/// decode a stored image; anything that isn't a clean 4-byte value is
/// treated as never written
fn decode_image(bytes: &[u8]) -> Option<u32> {
    let image: [u8; IMAGE_LEN] = bytes.try_into().ok()?;
    if image.iter().all(|b| *b == ERASED_BYTE) {
        return None;
    }
    Some(u32::from_le_bytes(image))
}

/// counter kept in a small file standing in for the EEPROM
pub struct FileCounter {
    path: PathBuf,
}

impl FileCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCounter { path: path.into() }
    }

    fn scratch_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PersistentCounter for FileCounter {
    fn read(&mut self) -> Result<Option<u32>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let value = decode_image(&bytes);
                if value.is_none() {
                    log::warn!(
                        "{}: {} byte image is blank or malformed",
                        self.path.display(),
                        bytes.len()
                    );
                }
                Ok(value)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// write to a scratch file, sync it, then swap it in, so a power cut
    /// leaves either the old image or the new one
    fn write(&mut self, value: u32) -> Result<(), StoreError> {
        let scratch = self.scratch_path();
        let mut f = File::create(&scratch)?;
        f.write_all(&value.to_le_bytes())?;
        f.sync_all()?;
        drop(f);
        fs::rename(&scratch, &self.path)?;
        sync_parent(&self.path)?;
        Ok(())
    }
}

/// the rename only sticks once the directory entry is on disk
#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// in-memory counter for testing; holds the raw image so corrupt data can
/// be simulated
#[derive(Clone, Debug, Default)]
pub struct MemoryCounter {
    image: Vec<u8>,
}

impl MemoryCounter {
    pub fn new() -> Self {
        MemoryCounter::default()
    }

    pub fn with_value(value: u32) -> Self {
        MemoryCounter {
            image: value.to_le_bytes().to_vec(),
        }
    }

    pub fn with_image(image: &[u8]) -> Self {
        MemoryCounter {
            image: image.to_vec(),
        }
    }
}

impl PersistentCounter for MemoryCounter {
    fn read(&mut self) -> Result<Option<u32>, StoreError> {
        Ok(decode_image(&self.image))
    }

    fn write(&mut self, value: u32) -> Result<(), StoreError> {
        self.image = value.to_le_bytes().to_vec();
        Ok(())
    }
}

/// The cumulative score, across sessions and power cycles.
pub struct ScoreStore<C: PersistentCounter> {
    counter: C,
}

impl<C: PersistentCounter> ScoreStore<C> {
    pub fn new(counter: C) -> Self {
        ScoreStore { counter }
    }

    /// stored total; unreadable or never-written storage counts as 0
    pub fn load(&mut self) -> u32 {
        match self.counter.read() {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                log::warn!("score unreadable, starting from 0: {}", e);
                0
            }
        }
    }

    pub fn save(&mut self, value: u32) -> Result<(), StoreError> {
        self.counter.write(value)
    }

    /// read-modify-write; the new total is durable once this returns `Ok`
    pub fn add_and_save(&mut self, delta: u32) -> Result<u32, StoreError> {
        let total = self.load().saturating_add(delta);
        self.save(total)?;
        Ok(total)
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }
}
