//! UE-NIB (`onos.uenib.UEService`) records and client.
//!
//! The message types mirror the service's protobuf definitions field for
//! field (same tags), so they encode/decode with `prost` directly.
//! Handlers talk to the service through [`UeService`]; [`UeServiceClient`]
//! is the gRPC implementation.

use std::collections::HashMap;

use futures::StreamExt;
use futures::stream::LocalBoxStream;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status};

/// Stream of items from a server-streaming call. `None` from `next()` is the
/// normal end of stream; an `Err` item is a failure.
pub type ItemStream<T> = LocalBoxStream<'static, Result<T, Status>>;

/// A tracked UE: its id plus a map from aspect type to opaque aspect value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ue {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(map = "string, message", tag = "2")]
    pub aspects: HashMap<::prost::alloc::string::String, ::prost_types::Any>,
}

impl Ue {
    /// Aspect type names, in map iteration order.
    pub fn aspect_types(&self) -> impl Iterator<Item = &str> {
        self.aspects.keys().map(String::as_str)
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUeRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub aspect_types: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUeResponse {
    #[prost(message, optional, tag = "1")]
    pub ue: ::core::option::Option<Ue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListUeRequest {
    #[prost(string, repeated, tag = "1")]
    pub aspect_types: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListUeResponse {
    #[prost(message, optional, tag = "1")]
    pub ue: ::core::option::Option<Ue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WatchUeRequest {
    #[prost(bool, tag = "1")]
    pub noreplay: bool,
    #[prost(string, repeated, tag = "2")]
    pub aspect_types: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WatchUeResponse {
    #[prost(message, optional, tag = "1")]
    pub event: ::core::option::Option<UeEvent>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UeEvent {
    #[prost(enumeration = "UeEventType", tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub ue: ::core::option::Option<Ue>,
}

impl UeEvent {
    /// Event type; values this client does not know read as `None`.
    pub fn event_type(&self) -> UeEventType {
        UeEventType::try_from(self.r#type).unwrap_or(UeEventType::None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum UeEventType {
    None = 0,
    Added = 1,
    Updated = 2,
    Removed = 3,
}

impl UeEventType {
    /// Protobuf enum value name.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            UeEventType::None => "NONE",
            UeEventType::Added => "ADDED",
            UeEventType::Updated => "UPDATED",
            UeEventType::Removed => "REMOVED",
        }
    }
}

/// The calls this client makes against the UE-NIB.
#[allow(async_fn_in_trait)]
pub trait UeService {
    /// Unary: one UE by id.
    async fn get_ue(&mut self, request: GetUeRequest) -> Result<GetUeResponse, Status>;

    /// Server-streaming: every UE.
    async fn list_ues(
        &mut self,
        request: ListUeRequest,
    ) -> Result<ItemStream<ListUeResponse>, Status>;

    /// Server-streaming: UE change events, until the server closes the stream.
    async fn watch_ues(
        &mut self,
        request: WatchUeRequest,
    ) -> Result<ItemStream<WatchUeResponse>, Status>;
}

const GET_UE: &str = "/onos.uenib.UEService/GetUE";
const LIST_UES: &str = "/onos.uenib.UEService/ListUEs";
const WATCH_UES: &str = "/onos.uenib.UEService/WatchUEs";

/// gRPC client for `onos.uenib.UEService`.
#[derive(Debug, Clone)]
pub struct UeServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl UeServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))
    }
}

impl UeService for UeServiceClient {
    async fn get_ue(&mut self, request: GetUeRequest) -> Result<GetUeResponse, Status> {
        self.ready().await?;
        let codec: ProstCodec<GetUeRequest, GetUeResponse> = ProstCodec::default();
        let response = self
            .inner
            .unary(Request::new(request), PathAndQuery::from_static(GET_UE), codec)
            .await?;
        Ok(response.into_inner())
    }

    async fn list_ues(
        &mut self,
        request: ListUeRequest,
    ) -> Result<ItemStream<ListUeResponse>, Status> {
        self.ready().await?;
        let codec: ProstCodec<ListUeRequest, ListUeResponse> = ProstCodec::default();
        let response = self
            .inner
            .server_streaming(Request::new(request), PathAndQuery::from_static(LIST_UES), codec)
            .await?;
        Ok(response.into_inner().boxed_local())
    }

    async fn watch_ues(
        &mut self,
        request: WatchUeRequest,
    ) -> Result<ItemStream<WatchUeResponse>, Status> {
        self.ready().await?;
        let codec: ProstCodec<WatchUeRequest, WatchUeResponse> = ProstCodec::default();
        let response = self
            .inner
            .server_streaming(Request::new(request), PathAndQuery::from_static(WATCH_UES), codec)
            .await?;
        Ok(response.into_inner().boxed_local())
    }
}
