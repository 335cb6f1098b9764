/*!
Route table: the input the document is assembled from.

Each route maps HTTP methods to the payload types its handler accepts and
returns. The table is only read during generation.
*/

use crate::{
    descriptor::{Describe, TypeRef},
    error::{OpenApiError, OpenApiResult},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTTP methods a route can document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
}

impl Method {
    /// Every method, in the order operations are assembled
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Connect,
        Method::Options,
        Method::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = OpenApiError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| OpenApiError::UnknownMethod(token.to_string()))
    }
}

/// Payload types of one method on a route
#[derive(Debug, Clone, Default)]
pub struct MethodSpec {
    /// Request body type, if the method accepts one
    pub request: Option<TypeRef>,
    /// Response body type per status code
    pub responses: BTreeMap<u16, TypeRef>,
}

impl MethodSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request body type
    pub fn request<T: Describe + ?Sized>(self) -> Self {
        self.request_type(TypeRef::of::<T>())
    }

    pub fn request_type(mut self, ty: TypeRef) -> Self {
        self.request = Some(ty);
        self
    }

    /// Declare the response body type for a status code
    pub fn response<T: Describe + ?Sized>(self, status: u16) -> Self {
        self.response_type(status, TypeRef::of::<T>())
    }

    pub fn response_type(mut self, status: u16, ty: TypeRef) -> Self {
        self.responses.insert(status, ty);
        self
    }
}

/// A path and the methods registered on it
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub methods: BTreeMap<Method, MethodSpec>,
}

impl Route {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            methods: BTreeMap::new(),
        }
    }

    pub fn method(mut self, method: Method, spec: MethodSpec) -> Self {
        self.methods.insert(method, spec);
        self
    }

    /// Register a method given as a textual token such as `"GET"`
    pub fn method_token(self, token: &str, spec: MethodSpec) -> OpenApiResult<Self> {
        let method = token.parse()?;
        Ok(self.method(method, spec))
    }

    pub fn get(self, spec: MethodSpec) -> Self {
        self.method(Method::Get, spec)
    }

    pub fn post(self, spec: MethodSpec) -> Self {
        self.method(Method::Post, spec)
    }

    pub fn put(self, spec: MethodSpec) -> Self {
        self.method(Method::Put, spec)
    }

    pub fn patch(self, spec: MethodSpec) -> Self {
        self.method(Method::Patch, spec)
    }

    pub fn delete(self, spec: MethodSpec) -> Self {
        self.method(Method::Delete, spec)
    }
}
