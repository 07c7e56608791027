use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ffi::{CStr, FromBytesWithNulError};
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::ops::{Deref, RangeBounds};
use std::str::{self, Utf8Error};

use crate::collections::contiguous::Vector;
use crate::memory::{Allocator, Global};
use crate::util::error::IndexOutOfBounds;
use crate::util::range::resolve_range;
use crate::util::result::ResultExtension;

/// A growable string of bytes, stored in a [`Vector<u8>`] that always ends in a NUL byte.
///
/// The terminator isn't part of the contents: [`len`](ByteString::len) and
/// [`as_bytes`](ByteString::as_bytes) exclude it, while
/// [`as_bytes_with_nul`](ByteString::as_bytes_with_nul) and [`as_ptr`](ByteString::as_ptr) expose
/// it for code that expects a C string. Edits are forwarded to the Vector, always at positions
/// before the terminator, and bytes are copied in bulk.
///
/// No encoding is assumed. [`to_str`](ByteString::to_str) checks for UTF-8 when it is needed.
///
/// # Examples
/// ```
/// # use raw_collections::collections::adapters::ByteString;
/// let mut string = ByteString::from("hello");
/// string.push_str(" world");
/// assert_eq!(string.as_bytes(), b"hello world");
/// assert_eq!(string.to_c_str().unwrap().to_bytes(), b"hello world");
/// ```
pub struct ByteString<A: Allocator = Global> {
    pub(crate) buf: Vector<u8, A>,
}

impl ByteString {
    /// Creates an empty ByteString. This allocates space for the terminator.
    pub fn new() -> ByteString {
        ByteString::new_in(Global)
    }

    /// Creates an empty ByteString with space for at least `cap` bytes before the terminator.
    pub fn with_cap(cap: usize) -> ByteString {
        ByteString::with_cap_in(cap, Global)
    }
}

impl<A: Allocator> ByteString<A> {
    pub fn new_in(alloc: A) -> ByteString<A> {
        ByteString::with_cap_in(0, alloc)
    }

    pub fn with_cap_in(cap: usize, alloc: A) -> ByteString<A> {
        let mut buf = Vector::with_cap_in(cap.saturating_add(1), alloc);
        buf.push(0);
        ByteString { buf }
    }

    /// Creates a ByteString holding a copy of `bytes`.
    pub fn from_bytes_in(bytes: &[u8], alloc: A) -> ByteString<A> {
        let mut string = ByteString::with_cap_in(bytes.len(), alloc);
        string.push_bytes(bytes);
        string
    }

    /// Returns the number of bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes that can be held before reallocating, excluding the
    /// terminator.
    pub fn cap(&self) -> usize {
        self.buf.cap() - 1
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.buf[..len]
    }

    /// Returns the contents followed by the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    /// Returns a pointer to the first byte. The contents are always followed by a NUL byte, so the
    /// pointer can be read as a C string for as long as the ByteString isn't modified.
    pub fn as_ptr(&self) -> *const u8 {
        self.buf.as_ptr()
    }

    /// Views the ByteString as a [`CStr`].
    ///
    /// # Errors
    /// Returns an error if the contents contain a NUL byte of their own.
    pub fn to_c_str(&self) -> Result<&CStr, FromBytesWithNulError> {
        CStr::from_bytes_with_nul(self.as_bytes_with_nul())
    }

    /// Views the ByteString as a [`str`].
    ///
    /// # Errors
    /// Returns an error if the contents aren't valid UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }

    pub fn push(&mut self, byte: u8) {
        self.buf.insert(self.len(), byte);
    }

    /// Removes and returns the last byte before the terminator, if there is one.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        Some(self.buf.remove(self.len() - 1))
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.insert_pod(self.len(), bytes);
    }

    pub fn push_str(&mut self, string: &str) {
        self.push_bytes(string.as_bytes());
    }

    /// Inserts `byte` at `index`, shifting every later byte back.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, byte: u8) {
        self.check_pos(index);
        self.buf.insert(index, byte);
    }

    /// Inserts a copy of `bytes` at `index`, shifting every later byte back.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert_bytes(&mut self, index: usize, bytes: &[u8]) {
        self.check_pos(index);
        self.buf.insert_pod(index, bytes);
    }

    /// Removes and returns the byte at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> u8 {
        if index >= self.len() {
            Err(IndexOutOfBounds {
                index,
                len: self.len(),
            }).throw()
        }
        self.buf.remove(index)
    }

    /// Removes the bytes within `range`, closing the gap.
    ///
    /// # Panics
    /// Panics if the range ends after `len` or starts after it ends.
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = resolve_range(range, self.len());
        self.buf.erase_range(range);
    }

    /// Shortens the ByteString to `len` bytes. Does nothing if it is already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.erase(len..);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Replaces the contents with a copy of `bytes`, reusing the allocation if it is large enough.
    pub fn assign(&mut self, bytes: &[u8]) {
        self.clear();
        self.push_bytes(bytes);
    }

    /// Ensures that there is space for at least `extra` more bytes.
    pub fn reserve(&mut self, extra: usize) {
        self.buf.reserve(extra);
    }

    /// Returns the index of the first occurrence of `needle`. An empty needle is found at `0`.
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return Some(0);
        }
        self.as_bytes().windows(needle.len()).position(|window| window == needle)
    }

    /// Creates a new ByteString from the bytes within `range`, in the same allocator.
    ///
    /// # Panics
    /// Panics if the range ends after `len` or starts after it ends.
    pub fn substr<R: RangeBounds<usize>>(&self, range: R) -> ByteString<A> {
        let range = resolve_range(range, self.len());
        ByteString::from_bytes_in(&self.as_bytes()[range], self.buf.allocator().clone())
    }

    fn check_pos(&self, index: usize) {
        if index > self.len() {
            Err(IndexOutOfBounds {
                index,
                len: self.len(),
            }).throw()
        }
    }
}

impl Default for ByteString {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for ByteString {
    fn from(value: &[u8]) -> Self {
        ByteString::from_bytes_in(value, Global)
    }
}

impl From<&str> for ByteString {
    fn from(value: &str) -> Self {
        ByteString::from(value.as_bytes())
    }
}

impl<A: Allocator> Extend<u8> for ByteString<A> {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let bytes: Vector<u8> = iter.into_iter().collect();
        self.push_bytes(&bytes);
    }
}

impl FromIterator<u8> for ByteString {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut string = ByteString::new();
        string.extend(iter);
        string
    }
}

impl<A: Allocator> Deref for ByteString<A> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl<A: Allocator> AsRef<[u8]> for ByteString<A> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: Allocator> Borrow<[u8]> for ByteString<A> {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: Allocator> Clone for ByteString<A> {
    fn clone(&self) -> Self {
        ByteString {
            buf: self.buf.clone(),
        }
    }
}

impl<A: Allocator> PartialEq for ByteString<A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> Eq for ByteString<A> {}

impl<A: Allocator> PartialOrd for ByteString<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Allocator> Ord for ByteString<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl<A: Allocator> Hash for ByteString<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl<A: Allocator> Write for ByteString<A> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<A: Allocator> Debug for ByteString<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.as_bytes().escape_ascii())
    }
}

impl<A: Allocator> Display for ByteString<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}
