//! Protobuf serialization for Max-AFE types.

use super::generated::{
    BitMatrix as BitMatrixProto, ClientShare as ClientShareProto,
    ServerAggregate as ServerAggregateProto,
};
use crate::aggregation::ServerAggregate;
use crate::sharing::Share;
use crate::{Error, MaxAfeParameters, Result};
use afe_math::bits::BitMatrix;
use afe_traits::{DeserializeParametrized, Serialize};
use prost::Message;
use std::sync::Arc;

/// Convert a BitMatrix to its packed protobuf representation
impl From<&BitMatrix> for BitMatrixProto {
    fn from(matrix: &BitMatrix) -> Self {
        BitMatrixProto {
            rows: matrix.rows() as u32,
            cols: matrix.cols() as u32,
            bits: matrix.to_packed(),
        }
    }
}

/// Convert Share to protobuf representation
impl From<&Share> for ClientShareProto {
    fn from(share: &Share) -> Self {
        ClientShareProto {
            fingerprint: share.par.fingerprint().to_vec(),
            server_id: share.server_id as u32,
            matrix: Some(BitMatrixProto::from(&share.matrix)),
        }
    }
}

/// Convert ServerAggregate to protobuf representation
impl From<&ServerAggregate> for ServerAggregateProto {
    fn from(aggregate: &ServerAggregate) -> Self {
        ServerAggregateProto {
            fingerprint: aggregate.par.fingerprint().to_vec(),
            server_id: aggregate.server_id as u32,
            clients: aggregate.clients as u64,
            matrix: Some(BitMatrixProto::from(&aggregate.matrix)),
        }
    }
}

/// Reject messages produced under other parameters.
fn check_fingerprint(fingerprint: &[u8], par: &MaxAfeParameters) -> Result<()> {
    if fingerprint != par.fingerprint().as_slice() {
        return Err(Error::ConfigurationMismatch(
            "message fingerprint does not match the local parameters".to_string(),
        ));
    }
    Ok(())
}

/// Unpack a `b × lam` matrix for `server_id`.
fn matrix_from_proto(
    proto: Option<BitMatrixProto>,
    server_id: usize,
    par: &MaxAfeParameters,
) -> Result<BitMatrix> {
    let proto = proto.ok_or_else(|| Error::malformed_share(server_id, "missing matrix"))?;
    let found = (proto.rows as usize, proto.cols as usize);
    if found != par.shape() {
        return Err(Error::shape_mismatch(par.shape(), found));
    }
    BitMatrix::from_packed(found.0, found.1, &proto.bits)
        .map_err(|e| Error::malformed_share(server_id, e.to_string()))
}

impl Serialize for Share {
    fn to_bytes(&self) -> Vec<u8> {
        ClientShareProto::from(self).encode_to_vec()
    }
}

impl DeserializeParametrized for Share {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<MaxAfeParameters>) -> Result<Self> {
        let proto: ClientShareProto = Message::decode(bytes)
            .map_err(|e| Error::MalformedShare(format!("undecodable share: {}", e)))?;
        check_fingerprint(&proto.fingerprint, par)?;

        let server_id = proto.server_id as usize;
        if server_id >= par.num_servers() {
            return Err(Error::invalid_server_id(server_id, par.num_servers()));
        }
        let matrix = matrix_from_proto(proto.matrix, server_id, par)?;
        Share::new(server_id, matrix, par)
    }
}

impl Serialize for ServerAggregate {
    fn to_bytes(&self) -> Vec<u8> {
        ServerAggregateProto::from(self).encode_to_vec()
    }
}

impl DeserializeParametrized for ServerAggregate {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<MaxAfeParameters>) -> Result<Self> {
        let proto: ServerAggregateProto = Message::decode(bytes)
            .map_err(|e| Error::MalformedShare(format!("undecodable aggregate: {}", e)))?;
        check_fingerprint(&proto.fingerprint, par)?;

        let server_id = proto.server_id as usize;
        if server_id >= par.num_servers() {
            return Err(Error::invalid_server_id(server_id, par.num_servers()));
        }
        let clients = usize::try_from(proto.clients)
            .map_err(|_| Error::malformed_share(server_id, "client count overflows"))?;
        let matrix = matrix_from_proto(proto.matrix, server_id, par)?;
        ServerAggregate::new(server_id, clients, matrix, par)
    }
}
