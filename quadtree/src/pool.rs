use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use tracing::trace;

pub trait Resettable {
    fn reset(&mut self);
}

impl Resettable for Vec<u32> {
    fn reset(&mut self) {
        self.clear();
    }
}

#[derive(Debug)]
pub struct ObjectPool<T: Resettable> {
    pool: Vec<T>,
    max_size: usize,
    allocations: usize,
}

impl<T> ObjectPool<T>
where
    T: Resettable,
{
    pub fn new(max_size: usize) -> Self {
        ObjectPool {
            pool: Vec::new(),
            max_size,
            allocations: 0,
        }
    }

    // Take a pooled object, or build a fresh one when the pool is drained
    pub fn get_or_else<F>(&mut self, create: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self.pool.pop() {
            Some(obj) => obj,
            None => {
                self.allocations += 1;
                create()
            }
        }
    }

    // Reset and keep the object unless the pool is already full
    pub fn return_object(&mut self, mut obj: T) {
        if self.pool.len() < self.max_size {
            obj.reset();
            self.pool.push(obj);
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Objects built because the pool was empty.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }
}

/// Shared pool of id buffers backing [`Yield`].
///
/// Cloning is cheap and yields a handle to the same pool, so one pool can be
/// handed to several trees. The pool is single-threaded.
#[derive(Clone)]
pub struct BufferPool {
    inner: Rc<RefCell<ObjectPool<Vec<u32>>>>,
    buffer_capacity: usize,
}

impl BufferPool {
    /// `buffer_capacity` is the id capacity of freshly allocated buffers and
    /// `max_pooled` bounds how many returned buffers are kept.
    pub fn new(buffer_capacity: usize, max_pooled: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObjectPool::new(max_pooled))),
            buffer_capacity,
        }
    }

    pub fn rent(&self) -> Yield {
        let capacity = self.buffer_capacity;
        let buffer = self.inner.borrow_mut().get_or_else(|| {
            trace!(capacity, "result pool drained, allocating a fresh buffer");
            Vec::with_capacity(capacity)
        });
        Yield {
            buffer,
            pool: self.clone(),
        }
    }

    /// Buffers currently waiting in the pool.
    pub fn pooled(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn allocations(&self) -> usize {
        self.inner.borrow().allocations()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    fn give_back(&self, buffer: Vec<u32>) {
        self.inner.borrow_mut().return_object(buffer);
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("buffer_capacity", &self.buffer_capacity)
            .field("pooled", &self.pooled())
            .field("allocations", &self.allocations())
            .finish()
    }
}

/// Ids matched by a query.
///
/// Dereferences to `[u32]`. The backing buffer goes back to its pool when the
/// `Yield` is dropped.
pub struct Yield {
    buffer: Vec<u32>,
    pool: BufferPool,
}

impl Yield {
    pub fn count(&self) -> usize {
        self.buffer.len()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.buffer
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, id: u32) {
        self.buffer.push(id);
    }
}

impl Deref for Yield {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.buffer
    }
}

impl<'a> IntoIterator for &'a Yield {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.buffer.iter()
    }
}

impl fmt::Debug for Yield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.buffer.iter()).finish()
    }
}

impl Drop for Yield {
    fn drop(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        self.pool.give_back(buffer);
    }
}
