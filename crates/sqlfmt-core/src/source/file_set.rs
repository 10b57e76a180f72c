//! The file set: an arena of source files sharing one position space.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use super::{Pos, Position};

/// Stable handle of a file inside its [`FileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(usize);

impl FileId {
    /// Returns the arena index of the file.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A source file registered in a [`FileSet`].
///
/// The file owns the positions `base..=base + size`; the extra position
/// past the last byte is where EOF is reported.
#[derive(Debug)]
pub struct File {
    id: FileId,
    name: String,
    base: usize,
    size: usize,
    /// Offsets of the first byte of each line, always starting with 0.
    lines: Mutex<Vec<usize>>,
}

impl File {
    /// Returns the handle of this file.
    #[must_use]
    pub const fn id(&self) -> FileId {
        self.id
    }

    /// Returns the name the file was registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base position of the file.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Returns the size of the file in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Converts a byte offset into a global position.
    ///
    /// # Panics
    ///
    /// Panics if `offset > self.size()`.
    #[must_use]
    pub fn pos(&self, offset: usize) -> Pos {
        assert!(
            offset <= self.size,
            "illegal file offset {offset} (file size {})",
            self.size
        );
        Pos::new(self.base + offset)
    }

    /// Converts a global position back into a byte offset.
    ///
    /// # Panics
    ///
    /// Panics if `pos` does not belong to this file.
    #[must_use]
    pub fn offset(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "position {pos} outside file {} [{}, {}]",
            self.name,
            self.base,
            self.base + self.size
        );
        pos.get() - self.base
    }

    /// Returns true if `pos` lies within `base..=base + size`.
    #[must_use]
    pub const fn contains(&self, pos: Pos) -> bool {
        pos.get() >= self.base && pos.get() <= self.base + self.size
    }

    /// Records the start offset of a new line.
    ///
    /// The offset is ignored unless it is larger than the last recorded
    /// line start and smaller than the file size.
    pub fn add_line(&self, offset: usize) {
        let mut lines = self.lines.lock();
        let after_last = lines.last().is_none_or(|&last| last < offset);
        if after_last && offset < self.size {
            lines.push(offset);
        }
    }

    /// Returns the number of lines recorded so far.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.lock().len()
    }

    /// Returns a snapshot of the recorded line start offsets.
    #[must_use]
    pub fn lines(&self) -> Vec<usize> {
        self.lines.lock().clone()
    }

    /// Resolves a position into a line and column.
    ///
    /// Lines that have not been scanned yet are not known, so positions
    /// past the scanner's progress resolve against the last known line.
    ///
    /// # Panics
    ///
    /// Panics if `pos` does not belong to this file.
    #[must_use]
    pub fn position(&self, pos: Pos) -> Position {
        let offset = self.offset(pos);
        let lines = self.lines.lock();
        let line = lines.partition_point(|&start| start <= offset);
        let line_start = lines[line - 1];
        Position {
            filename: self.name.clone(),
            line,
            column: offset - line_start + 1,
        }
    }
}

struct Inner {
    base: usize,
    files: Vec<Arc<File>>,
}

/// A set of source files sharing one monotonic position space.
///
/// Registration and lookups may happen from many threads; the file list and
/// the base counter sit behind a single lock.
pub struct FileSet {
    inner: RwLock<Inner>,
}

impl FileSet {
    /// Creates an empty file set whose first file starts at position 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                base: 1,
                files: Vec::new(),
            }),
        }
    }

    /// Returns the minimum base the next registered file may use.
    #[must_use]
    pub fn base(&self) -> usize {
        self.inner.read().base
    }

    /// Registers a new file and returns it.
    ///
    /// With `base == None` the file is placed at [`FileSet::base`]. One
    /// position is left unused after the file so that neighbouring files
    /// never share a position.
    ///
    /// # Panics
    ///
    /// Panics if `base` is below the current next base, or if the position
    /// space overflows.
    pub fn register(&self, name: impl Into<String>, base: Option<usize>, size: usize) -> Arc<File> {
        let mut inner = self.inner.write();
        let base = base.unwrap_or(inner.base);
        assert!(
            base >= inner.base,
            "illegal base {base} (next base is {})",
            inner.base
        );
        let next = base
            .checked_add(size)
            .and_then(|end| end.checked_add(1))
            .unwrap_or_else(|| panic!("position overflow registering {size} bytes at {base}"));

        let file = Arc::new(File {
            id: FileId(inner.files.len()),
            name: name.into(),
            base,
            size,
            lines: Mutex::new(vec![0]),
        });
        trace!(name = file.name(), base, size, "registered file");
        inner.base = next;
        inner.files.push(Arc::clone(&file));
        file
    }

    /// Returns the file with the given handle.
    #[must_use]
    pub fn file(&self, id: FileId) -> Option<Arc<File>> {
        self.inner.read().files.get(id.0).cloned()
    }

    /// Returns the file owning `pos`.
    #[must_use]
    pub fn file_for(&self, pos: Pos) -> Option<Arc<File>> {
        if !pos.is_valid() {
            return None;
        }
        let inner = self.inner.read();
        let idx = inner.files.partition_point(|f| f.base <= pos.get());
        let file = inner.files.get(idx.checked_sub(1)?)?;
        file.contains(pos).then(|| Arc::clone(file))
    }

    /// Resolves `pos` into a file name, line and column.
    #[must_use]
    pub fn position(&self, pos: Pos) -> Option<Position> {
        self.file_for(pos).map(|file| file.position(pos))
    }

    /// Returns the number of registered files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().files.len()
    }

    /// Returns true if no file has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().files.is_empty()
    }
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FileSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("FileSet")
            .field("base", &inner.base)
            .field("files", &inner.files.len())
            .finish()
    }
}
