//! A Rust implementation of UUID version 7 built on a stateless generation core
//!
//! ```rust
//! let uuid = uuidv7::uuid7();
//! println!("{}", uuid); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        counter                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 42-bit `counter` field accommodates the sequence counter that ensures the
//!   monotonic order of IDs generated within the same millisecond. The counter is
//!   incremented by one for each new ID generated within the same timestamp and is
//!   filled with random bits whenever the `unix_ts_ms` changes.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 32 `rand` bits are filled with a cryptographically strong random
//!   number on every call.
//!
//! Unlike most UUIDv7 generators, this crate isolates the generation logic in a
//! single pure function, [`step::generate`]: given the current Unix time, fresh
//! random bytes, and the immediately preceding UUID, it derives the next UUID and
//! reports how it was derived through a [`Status`] code. The previous timestamp
//! and counter are extracted from the preceding UUID itself, so the core holds no
//! state at all; [`V7Generator`] and [`uuid7()`] layer the wall clock, a batched
//! entropy pool, and shared previous-UUID storage on top of it.
//!
//! In the very rare circumstances where the 42-bit `counter` field reaches the
//! maximum value and can no more be incremented within the same timestamp, this
//! library increments the `unix_ts_ms`; therefore, the `unix_ts_ms` may have a
//! larger value than that of the real-time clock. This library goes on with such
//! larger `unix_ts_ms` values caused by counter overflows as long as the
//! difference from the system clock is small enough. If the system clock moves
//! back more than ten seconds, this library starts over from the clock reading
//! and thus breaks the monotonic order of generated identifiers.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen` (implies `std`): enables the process-wide [`uuid7()`] entry
//!   point backed by `rand_chacha`.
//! - `std`: enables `std` integration ([`V7Generator::generate`] and the
//!   `std::error::Error` impls). Without it, this crate fits `no_std`
//!   environments and exposes the core through [`step`] and
//!   [`V7Generator::generate_core`].
//!
//! Optional features:
//!
//! - `serde`: serialization/deserialization of [`Uuid`] objects.
//! - `uuid`: conversions to/from the `uuid` crate's type.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{ParseError, Uuid};

pub mod step;
#[doc(inline)]
pub use step::Status;

mod generator;
pub use generator::V7Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::uuid7;
