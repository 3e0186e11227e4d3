//! Inbound adapters that translate external requests into facade calls while
//! keeping framework details at the edge.

pub mod http;
