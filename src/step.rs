//! The stateless UUIDv7 generation step.
//!
//! This module hosts the algorithmic core of the crate: [`generate`] derives the next UUID from
//! the current Unix time, fresh random bytes, and the immediately preceding UUID, without holding
//! any state of its own. The previous timestamp and counter are read back out of the preceding
//! UUID, so callers own the chaining; [`crate::V7Generator`] wraps this function together with a
//! clock, an entropy pool, and previous-UUID storage for everyday use.

#[cfg(not(feature = "std"))]
use core as std;

use std::fmt;

use crate::Uuid;

/// The number of random bytes a single generation step may consume.
pub const RAND_LEN: usize = 10;

const MAX_TIMESTAMP: u64 = (1 << 48) - 1;
const MAX_COUNTER: u64 = (1 << 42) - 1;
const ROLLBACK_ALLOWANCE: u64 = 10_000; // milliseconds

/// Generates a new UUIDv7 from the given Unix time, random bytes, and preceding UUID.
///
/// This function consumes the leading four bytes of `rand_bytes` or the whole buffer per call,
/// depending on the path taken; [`Status::n_rand_consumed`] maps the returned status to the exact
/// number, so callers drawing from a shared pool know how far to advance their cursor.
///
/// `previous` is the UUID produced by the immediately preceding successful call, from which the
/// previous timestamp and counter are extracted. Pass `None` if the ascending order of UUIDs
/// within the same timestamp does not matter.
///
/// # Examples
///
/// ```rust
/// use uuidv7::step;
///
/// let rand_bytes: [u8; step::RAND_LEN] = [0xaa; step::RAND_LEN];
/// let (first, status) = step::generate(0x017f_22e2_79b0, &rand_bytes, None)?;
/// assert_eq!(status, step::Status::Unprecedented);
/// assert_eq!(first.unix_ts_ms(), 0x017f_22e2_79b0);
///
/// let (next, status) = step::generate(0x017f_22e2_79b0, &rand_bytes, Some(&first))?;
/// assert_eq!(status, step::Status::CounterInc);
/// assert_eq!(next.counter(), first.counter() + 1);
/// # Ok::<(), uuidv7::step::Error>(())
/// ```
pub fn generate(
    unix_ts_ms: u64,
    rand_bytes: &[u8; RAND_LEN],
    previous: Option<&Uuid>,
) -> Result<(Uuid, Status), Error> {
    if unix_ts_ms > MAX_TIMESTAMP {
        return Err(Error::InvalidTimestamp);
    }

    let (timestamp, status) = if let Some(prev) = previous {
        let prev_timestamp = prev.unix_ts_ms();
        if unix_ts_ms > prev_timestamp {
            (unix_ts_ms, Status::NewTimestamp)
        } else if unix_ts_ms + ROLLBACK_ALLOWANCE < prev_timestamp {
            // start over if clock moves back by more than ten seconds
            (unix_ts_ms, Status::ClockRollback)
        } else {
            let counter = prev.counter() + 1;
            if counter <= MAX_COUNTER {
                // keep the previous timestamp, spending four random bytes on the tail only
                return Ok((
                    Uuid::from_fields_v7(
                        prev_timestamp,
                        (counter >> 30) as u16,
                        ((counter & 0x3fff_ffff) << 32)
                            | u32::from_be_bytes([
                                rand_bytes[0],
                                rand_bytes[1],
                                rand_bytes[2],
                                rand_bytes[3],
                            ]) as u64,
                    ),
                    Status::CounterInc,
                ));
            } else if prev_timestamp < MAX_TIMESTAMP {
                // increment the previous timestamp at counter overflow
                (prev_timestamp + 1, Status::TimestampInc)
            } else {
                return Err(Error::TimestampOverflow);
            }
        }
    } else {
        (unix_ts_ms, Status::Unprecedented)
    };

    Ok((
        Uuid::from_fields_v7(
            timestamp,
            ((rand_bytes[0] & 0x0f) as u16) << 8 | rand_bytes[1] as u16,
            u64::from_be_bytes([
                rand_bytes[2],
                rand_bytes[3],
                rand_bytes[4],
                rand_bytes[5],
                rand_bytes[6],
                rand_bytes[7],
                rand_bytes[8],
                rand_bytes[9],
            ]) & ((1 << 62) - 1),
        ),
        status,
    ))
}

/// The outcome of a generation step, describing how the new UUID was derived from the inputs.
///
/// Callers can usually ignore the status unless they need to guarantee the monotonic order of
/// UUIDs or track the consumption of a shared random-byte pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Status {
    /// The `unix_ts_ms` passed was used as is because no preceding UUID was given.
    Unprecedented,

    /// The `unix_ts_ms` passed was used because it was greater than the previous timestamp.
    NewTimestamp,

    /// The counter was incremented because the `unix_ts_ms` passed was no greater than the
    /// previous timestamp.
    CounterInc,

    /// The previous timestamp was incremented because the counter had reached its maximum value.
    TimestampInc,

    /// The monotonic order of UUIDs was broken because the `unix_ts_ms` passed was less than the
    /// previous timestamp by more than ten seconds.
    ClockRollback,
}

impl Status {
    /// Returns the number of leading `rand_bytes` consumed by the [`generate`] call that returned
    /// this status: `4` if the counter was incremented, or `10` otherwise.
    pub const fn n_rand_consumed(self) -> usize {
        match self {
            Self::CounterInc => 4,
            _ => RAND_LEN,
        }
    }
}

/// Error that aborts a generation step without producing a UUID.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Error {
    /// The `unix_ts_ms` passed does not fit in the 48-bit timestamp field.
    InvalidTimestamp,

    /// The previous timestamp could not be incremented because it had reached its maximum value.
    TimestampOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimestamp => write!(f, "`unix_ts_ms` exceeds the 48-bit range"),
            Self::TimestampOverflow => {
                write!(f, "could not increment the timestamp at its maximum value")
            }
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{generate, Error, Status, MAX_COUNTER, MAX_TIMESTAMP, RAND_LEN};
    use crate::Uuid;

    /// Stamps version and variant bits into generated UUIDs
    #[test]
    fn stamps_version_and_variant_bits_into_generated_uuids() {
        let mut ts = 0x0123_4567_89abu64;
        let mut prev: Option<Uuid> = None;
        for i in 0..10_000u64 {
            if i % 4 == 0 {
                ts += 1;
            }
            let (e, _) = generate(ts, &rand::random(), prev.as_ref()).unwrap();
            assert_eq!(e.as_bytes()[6] >> 4, 0x7);
            assert_eq!(e.as_bytes()[8] >> 6, 0b10);
            assert!(e.unix_ts_ms() <= MAX_TIMESTAMP);
            assert!(e.counter() <= MAX_COUNTER);
            prev = Some(e);
        }
    }

    /// Uses the `unix_ts_ms` passed when no previous UUID is given
    #[test]
    fn uses_the_unix_ts_ms_passed_when_no_previous_uuid_is_given() {
        let rand_bytes: [u8; RAND_LEN] = rand::random();
        let (e, status) = generate(0x0123_4567_89ab, &rand_bytes, None).unwrap();
        assert_eq!(status, Status::Unprecedented);
        assert_eq!(e.unix_ts_ms(), 0x0123_4567_89ab);
        assert_eq!(e.as_bytes()[6], 0x70 | (rand_bytes[0] & 0x0f));
        assert_eq!(e.as_bytes()[7], rand_bytes[1]);
        assert_eq!(e.as_bytes()[8], 0x80 | (rand_bytes[2] & 0x3f));
        assert_eq!(e.as_bytes()[9..], rand_bytes[3..]);
    }

    /// Generates strictly increasing UUIDs when chained, even with decreasing or constant
    /// timestamp
    #[test]
    fn generates_strictly_increasing_uuids_when_chained() {
        let ts = 0x0123_4567_89abu64;
        let (mut prev, status) = generate(ts, &rand::random(), None).unwrap();
        assert_eq!(status, Status::Unprecedented);
        for i in 0..100_000u64 {
            let (curr, _) = generate(ts - i.min(4_000), &rand::random(), Some(&prev)).unwrap();
            assert!(prev < curr);
            prev = curr;
        }
        assert!(prev.unix_ts_ms() >= ts);
    }

    /// Increments the counter when `unix_ts_ms` does not move forward
    #[test]
    fn increments_the_counter_when_unix_ts_ms_does_not_move_forward() {
        let ts = 0x0123_4567_89abu64;
        let prev = Uuid::from_fields_v7(ts, 0xcc3, 0x18c4_dc0c_0c07_398f);
        let rand_bytes: [u8; RAND_LEN] = rand::random();
        for unix_ts_ms in [ts, ts - 1, ts - 10_000] {
            let (e, status) = generate(unix_ts_ms, &rand_bytes, Some(&prev)).unwrap();
            assert_eq!(status, Status::CounterInc);
            assert_eq!(e.unix_ts_ms(), ts);
            assert_eq!(e.counter(), prev.counter() + 1);
            assert_eq!(e.as_bytes()[12..], rand_bytes[..4]);
        }
    }

    /// Fills the counter field from the random bytes on a new timestamp
    #[test]
    fn fills_the_counter_field_from_the_random_bytes_on_a_new_timestamp() {
        let ts = 0x0123_4567_89abu64;
        let (prev, _) = generate(ts, &rand::random(), None).unwrap();
        let rand_bytes: [u8; RAND_LEN] = rand::random();
        let (e, status) = generate(ts + 1, &rand_bytes, Some(&prev)).unwrap();
        assert_eq!(status, Status::NewTimestamp);
        assert_eq!(e.unix_ts_ms(), ts + 1);
        assert_eq!(e.as_bytes()[6], 0x70 | (rand_bytes[0] & 0x0f));
        assert_eq!(e.as_bytes()[7], rand_bytes[1]);
        assert_eq!(e.as_bytes()[8], 0x80 | (rand_bytes[2] & 0x3f));
        assert_eq!(e.as_bytes()[9..], rand_bytes[3..]);
    }

    /// Increments the previous timestamp at counter overflow
    #[test]
    fn increments_the_previous_timestamp_at_counter_overflow() {
        let ts = 0x0123_4567_89abu64;
        let prev = Uuid::from_fields_v7(ts, 0xfff, (0x3fff_ffffu64 << 32) | 0xdead_beef);
        assert_eq!(prev.counter(), MAX_COUNTER);
        let (e, status) = generate(ts, &rand::random(), Some(&prev)).unwrap();
        assert_eq!(status, Status::TimestampInc);
        assert_eq!(e.unix_ts_ms(), ts + 1);
    }

    /// Fails to increment the previous timestamp at its maximum value
    #[test]
    fn fails_to_increment_the_previous_timestamp_at_its_maximum_value() {
        let prev = Uuid::from_fields_v7(MAX_TIMESTAMP, 0xfff, (0x3fff_ffffu64 << 32) | 1);
        assert_eq!(
            generate(MAX_TIMESTAMP, &rand::random(), Some(&prev)),
            Err(Error::TimestampOverflow)
        );
        assert_eq!(
            generate(MAX_TIMESTAMP - 4_000, &rand::random(), Some(&prev)),
            Err(Error::TimestampOverflow)
        );
    }

    /// Starts over when clock moves back by more than ten seconds
    #[test]
    fn starts_over_when_clock_moves_back_by_more_than_ten_seconds() {
        let ts = 0x0123_4567_89abu64;
        let (prev, _) = generate(ts, &rand::random(), None).unwrap();

        let (e, status) = generate(ts - 10_000, &rand::random(), Some(&prev)).unwrap();
        assert_eq!(status, Status::CounterInc);
        assert_eq!(e.unix_ts_ms(), ts);
        assert!(prev < e);

        let (e, status) = generate(ts - 10_001, &rand::random(), Some(&prev)).unwrap();
        assert_eq!(status, Status::ClockRollback);
        assert_eq!(e.unix_ts_ms(), ts - 10_001);
        assert!(e < prev);
    }

    /// Rejects `unix_ts_ms` beyond the 48-bit range
    #[test]
    fn rejects_unix_ts_ms_beyond_the_48_bit_range() {
        assert_eq!(
            generate(1 << 48, &rand::random(), None),
            Err(Error::InvalidTimestamp)
        );
        assert!(generate(MAX_TIMESTAMP, &rand::random(), None).is_ok());
    }

    /// Maps each status to the number of random bytes consumed
    #[test]
    fn maps_each_status_to_the_number_of_random_bytes_consumed() {
        assert_eq!(Status::Unprecedented.n_rand_consumed(), 10);
        assert_eq!(Status::NewTimestamp.n_rand_consumed(), 10);
        assert_eq!(Status::CounterInc.n_rand_consumed(), 4);
        assert_eq!(Status::TimestampInc.n_rand_consumed(), 10);
        assert_eq!(Status::ClockRollback.n_rand_consumed(), 10);
    }
}
