//! Goals module - domain models and the wire codec.

mod goals_codec;
mod goals_model;


pub use goals_codec::{decode_goal, encode_goal};
pub use goals_model::{Goal, NewGoal};
