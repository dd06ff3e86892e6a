//! Wire formats spoken by the enrichment adapters.
//!
//! * [`dns`]: reverse (PTR) queries and answer decoding.
//! * [`wsman`]: WS-Management enumeration envelopes and WMI field extraction.

pub mod dns;
pub mod wsman;
