//! # Filesystem Block Store
//!
//! One file per block under the repository's `blocks/` directory, named by the
//! hex CID. Reads re-hash the bytes, so a damaged file surfaces as
//! `BlockStoreError::Corrupt` instead of wrong content.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use shared_types::{Block, Cid};

use crate::ports::errors::BlockStoreError;
use crate::ports::outbound::BlockStore;

/// Block store over a directory of CID-named files.
#[derive(Debug)]
pub struct FsBlockStore {
    dir: PathBuf,
}

impl FsBlockStore {
    /// Open a block store over `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BlockStoreError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(BlockStoreError::MissingDirectory(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Free bytes on the volume holding the blocks.
    pub fn available_space(&self) -> Result<u64, BlockStoreError> {
        Ok(fs2::available_space(&self.dir)?)
    }

    fn block_path(&self, cid: &Cid) -> PathBuf {
        self.dir.join(cid.to_hex())
    }
}

impl BlockStore for FsBlockStore {
    fn put(&self, block: &Block) -> Result<(), BlockStoreError> {
        let path = self.block_path(block.cid());
        if path.exists() {
            return Ok(());
        }
        // Each writer gets its own temp file; the rename is atomic and the
        // content is identical, so the last writer winning is fine.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(block.data())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(cid = %block.cid(), bytes = block.data().len(), "block stored");
        Ok(())
    }

    fn get(&self, cid: &Cid) -> Result<Option<Block>, BlockStoreError> {
        let data = match fs::read(self.block_path(cid)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match Block::from_parts(*cid, data) {
            Some(block) => Ok(Some(block)),
            None => {
                warn!(%cid, "stored block does not match its CID");
                Err(BlockStoreError::Corrupt(*cid))
            }
        }
    }

    fn has(&self, cid: &Cid) -> Result<bool, BlockStoreError> {
        Ok(self.block_path(cid).is_file())
    }

    fn delete(&self, cid: &Cid) -> Result<(), BlockStoreError> {
        match fs::remove_file(self.block_path(cid)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for FsBlockStore {
    fn drop(&mut self) {
        debug!("blockstore over {} dropped", self.dir.display());
    }
}
