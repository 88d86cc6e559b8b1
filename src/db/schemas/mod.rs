//! Database schemas
//!
//! Defines MongoDB document structures for pledges.

mod pledge;

pub use pledge::{
    known_profile_filter, profile_type_filter, PledgeDoc, PublicPledgeDoc, PLEDGE_COLLECTION,
};
