// Chunk: docs/chunks/arena_allocator - Reserve/commit/decommit bump allocator

//! Virtual memory primitives backing [`Arena`](crate::Arena).
//!
//! A reservation claims address space without backing it with memory.
//! Committing makes a sub-range readable and writable; decommitting hands
//! the pages back to the operating system while the address range stays
//! reserved. On Unix this maps onto `mmap` / `mprotect` / `munmap`.
//!
//! Offsets and sizes passed to `commit` and `decommit` must be multiples of
//! [`page_size`].

use std::io;
use std::ptr::NonNull;

#[cfg(unix)]
mod imp {
    use std::io;
    use std::ptr::{self, NonNull};

    #[cfg(target_os = "linux")]
    const NORESERVE: libc::c_int = libc::MAP_NORESERVE;
    #[cfg(not(target_os = "linux"))]
    const NORESERVE: libc::c_int = 0;

    pub fn page_size() -> usize {
        // SAFETY: sysconf has no preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            size as usize
        } else {
            4096
        }
    }

    pub fn reserve(size: usize) -> io::Result<NonNull<u8>> {
        // SAFETY: anonymous private mapping at a kernel-chosen address; no
        // existing memory is affected.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_NONE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | NORESERVE,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "mmap returned a null mapping"))
    }

    /// # Safety
    ///
    /// `base + offset .. base + offset + size` must lie inside a live
    /// reservation returned by [`reserve`].
    pub unsafe fn commit(base: NonNull<u8>, offset: usize, size: usize) -> io::Result<()> {
        let addr = base.as_ptr().add(offset).cast::<libc::c_void>();
        if libc::mprotect(addr, size, libc::PROT_READ | libc::PROT_WRITE) != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// # Safety
    ///
    /// Same as [`commit`]; no live reference may point into the range.
    pub unsafe fn decommit(base: NonNull<u8>, offset: usize, size: usize) -> io::Result<()> {
        // Mapping fresh PROT_NONE pages over the range drops the old pages
        // and keeps the address range reserved.
        let addr = base.as_ptr().add(offset).cast::<libc::c_void>();
        let ptr = libc::mmap(
            addr,
            size,
            libc::PROT_NONE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_FIXED | NORESERVE,
            -1,
            0,
        );
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// # Safety
    ///
    /// `base` and `size` must describe a reservation returned by
    /// [`reserve`] that is not used afterwards.
    pub unsafe fn release(base: NonNull<u8>, size: usize) {
        let _ = libc::munmap(base.as_ptr().cast::<libc::c_void>(), size);
    }
}

#[cfg(not(unix))]
mod imp {
    //! Portable fallback: the whole reservation is allocated up front and
    //! commit/decommit only do bookkeeping.

    use std::alloc::{self, Layout};
    use std::io;
    use std::ptr::NonNull;

    const FALLBACK_PAGE: usize = 4096;

    pub fn page_size() -> usize {
        FALLBACK_PAGE
    }

    fn layout(size: usize) -> io::Result<Layout> {
        Layout::from_size_align(size, FALLBACK_PAGE)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
    }

    pub fn reserve(size: usize) -> io::Result<NonNull<u8>> {
        let layout = layout(size)?;
        // SAFETY: layout has a non-zero size (the arena never reserves 0 bytes).
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "reservation failed"))
    }

    pub unsafe fn commit(_base: NonNull<u8>, _offset: usize, _size: usize) -> io::Result<()> {
        Ok(())
    }

    pub unsafe fn decommit(base: NonNull<u8>, offset: usize, size: usize) -> io::Result<()> {
        std::ptr::write_bytes(base.as_ptr().add(offset), 0, size);
        Ok(())
    }

    pub unsafe fn release(base: NonNull<u8>, size: usize) {
        if let Ok(layout) = layout(size) {
            alloc::dealloc(base.as_ptr(), layout);
        }
    }
}

/// Returns the operating system page size.
pub fn page_size() -> usize {
    imp::page_size()
}

/// Reserves `size` bytes of address space with no access rights.
pub fn reserve(size: usize) -> io::Result<NonNull<u8>> {
    imp::reserve(size)
}

/// Makes a range of a reservation readable and writable.
///
/// # Safety
///
/// The range must lie inside a live reservation returned by [`reserve`].
pub unsafe fn commit(base: NonNull<u8>, offset: usize, size: usize) -> io::Result<()> {
    imp::commit(base, offset, size)
}

/// Returns a committed range to the operating system, keeping it reserved.
///
/// # Safety
///
/// The range must lie inside a live reservation and nothing may still
/// reference memory inside it.
pub unsafe fn decommit(base: NonNull<u8>, offset: usize, size: usize) -> io::Result<()> {
    imp::decommit(base, offset, size)
}

/// Releases a whole reservation.
///
/// # Safety
///
/// `base`/`size` must come from [`reserve`] and must not be used again.
pub unsafe fn release(base: NonNull<u8>, size: usize) {
    imp::release(base, size)
}
