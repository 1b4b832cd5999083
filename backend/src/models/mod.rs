//! Domain value types shared by the engine, the repository layer and the HTTP API.
//!
//! Everything here is plain data: the repository hands out owned snapshots of
//! these types and the ranking engine only ever reads them.

pub mod band;
pub mod macros;
pub mod poll;
pub mod rehearsal;
pub mod time;

pub use band::*;
pub use poll::*;
pub use rehearsal::*;
pub use time::*;

crate::define_id_type!(i64, UserId);
crate::define_id_type!(i64, BandId);
crate::define_id_type!(i64, PollId);
crate::define_id_type!(i64, PollOptionId);
crate::define_id_type!(i64, RehearsalId);
