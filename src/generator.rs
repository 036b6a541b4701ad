//! UUIDv7 generator that wires the stateless core to a clock and an entropy pool.

use rand::RngCore;

use crate::step::{self, Status};
use crate::Uuid;

/// The number of random bytes buffered per entropy-source call.
const RAND_POOL_LEN: usize = 256;

/// Represents a UUIDv7 generator that pairs the stateless [`step::generate`] core with a
/// previous-UUID slot and a batched entropy pool, guaranteeing the monotonic order of UUIDs
/// generated within the same millisecond.
///
/// The generator draws random bytes from the wrapped [`RngCore`] type in 256-byte batches and
/// refills the pool once fewer than ten unconsumed bytes remain, so a counter-increment call
/// spends four buffered bytes instead of a fresh entropy-source round trip.
///
/// This type also helps control the scope of guaranteed order of the generated UUIDs. The
/// following example guarantees the process-wide (cross-thread) monotonicity using Rust's
/// standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use uuidv7::V7Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(V7Generator::new(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// The generator comes with two methods that generate a UUIDv7:
///
/// | Flavor            | Timestamp | Outcome                       |
/// | ----------------- | --------- | ----------------------------- |
/// | [`generate`]      | Now       | UUID only                     |
/// | [`generate_core`] | Argument  | UUID plus [`Status`], or error |
///
/// Both feed the previous UUID back into the core, so UUIDs remain monotonically increasing as
/// long as the timestamp stays within ten seconds at or behind the previous one; a larger
/// rollback starts the sequence over from the timestamp passed.
///
/// [`generate`]: V7Generator::generate
/// [`generate_core`]: V7Generator::generate_core
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct V7Generator<R> {
    previous: Option<Uuid>,
    rand_pool: [u8; RAND_POOL_LEN],
    n_pool_consumed: usize,

    /// The random number generator used to refill the pool.
    rng: R,
}

impl<R> V7Generator<R> {
    /// Creates a generator instance.
    pub const fn new(rng: R) -> Self {
        Self {
            previous: None,
            rand_pool: [0; RAND_POOL_LEN],
            n_pool_consumed: RAND_POOL_LEN,
            rng,
        }
    }

    /// Returns a reference to the UUID produced by the last successful call, if any.
    pub const fn previous(&self) -> Option<&Uuid> {
        self.previous.as_ref()
    }
}

impl<R: RngCore> V7Generator<R> {
    /// Generates a new UUIDv7 object from the current timestamp.
    ///
    /// # Panics
    ///
    /// Panics if the system clock reads before the Unix epoch or past the 48-bit millisecond
    /// range.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn generate(&mut self) -> Uuid {
        use std::time;
        let (uuid, _) = self
            .generate_core(
                time::SystemTime::now()
                    .duration_since(time::UNIX_EPOCH)
                    .expect("clock may have gone backwards")
                    .as_millis() as u64,
            )
            .expect("clock reading exceeded the 48-bit range");
        uuid
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed.
    ///
    /// The previous-UUID slot and the pool cursor advance only when the core step succeeds; a
    /// failed call leaves the generator state untouched.
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<(Uuid, Status), step::Error> {
        if RAND_POOL_LEN - self.n_pool_consumed < step::RAND_LEN {
            self.rng.fill_bytes(&mut self.rand_pool);
            self.n_pool_consumed = 0;
        }

        let mut rand_bytes = [0u8; step::RAND_LEN];
        rand_bytes.copy_from_slice(&self.rand_pool[self.n_pool_consumed..][..step::RAND_LEN]);

        let (uuid, status) = step::generate(unix_ts_ms, &rand_bytes, self.previous.as_ref())?;
        self.previous = Some(uuid);
        self.n_pool_consumed += status.n_rand_consumed();
        Ok((uuid, status))
    }
}

impl<R: Default> Default for V7Generator<R> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuidv7::V7Generator;
///
/// V7Generator::new(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<R: RngCore> Iterator for V7Generator<R> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<R: RngCore> std::iter::FusedIterator for V7Generator<R> {}
