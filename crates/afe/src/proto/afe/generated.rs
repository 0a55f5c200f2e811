#![allow(missing_docs)]
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parameters {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    #[prost(uint32, tag = "2")]
    pub domain_size: u32,
    #[prost(uint32, tag = "3")]
    pub lambda: u32,
    #[prost(uint32, tag = "4")]
    pub num_servers: u32,
}
/// Row-major, eight cells per byte, least significant bit first, zero padded.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BitMatrix {
    #[prost(uint32, tag = "1")]
    pub rows: u32,
    #[prost(uint32, tag = "2")]
    pub cols: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub bits: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientShare {
    #[prost(bytes = "vec", tag = "1")]
    pub fingerprint: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub server_id: u32,
    #[prost(message, optional, tag = "3")]
    pub matrix: ::core::option::Option<BitMatrix>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerAggregate {
    #[prost(bytes = "vec", tag = "1")]
    pub fingerprint: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub server_id: u32,
    #[prost(uint64, tag = "3")]
    pub clients: u64,
    #[prost(message, optional, tag = "4")]
    pub matrix: ::core::option::Option<BitMatrix>,
}
