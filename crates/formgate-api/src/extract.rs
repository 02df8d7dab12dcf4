//! Submission payload extraction.
//!
//! Forms arrive either urlencoded (contact, partner, newsletter) or as
//! multipart (career, which may carry a resume). Both decode into the same
//! ordered `FieldMap` plus an optional upload, and the client IP is resolved
//! here so the gate never touches raw request parts.

use crate::response::FormResponse;
use crate::utils::ip::resolve_client_ip;
use axum::extract::{ConnectInfo, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use formgate_core::FieldMap;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug)]
pub struct FormPayload {
    pub fields: FieldMap,
    pub upload: Option<UploadedFile>,
    pub client_ip: String,
}

fn invalid_body() -> FormResponse {
    FormResponse::fail("Invalid request body.", Vec::new())
}

impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = FormResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let socket_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        let client_ip = resolve_client_ip(req.headers(), socket_addr);

        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|_| invalid_body())?;

            let mut fields = FieldMap::new();
            let mut upload = None;

            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|_| invalid_body())?
            {
                let name = field.name().unwrap_or_default().to_string();
                match field.file_name().map(str::to_string) {
                    Some(filename) => {
                        let content_type = field
                            .content_type()
                            .unwrap_or("application/octet-stream")
                            .to_string();
                        let data = field.bytes().await.map_err(|_| invalid_body())?;
                        // Browsers send an empty file part when no file was
                        // chosen; only the first real file counts.
                        if !filename.is_empty() && !data.is_empty() && upload.is_none() {
                            upload = Some(UploadedFile {
                                filename,
                                content_type,
                                data,
                            });
                        }
                    }
                    None => {
                        let value = field.text().await.map_err(|_| invalid_body())?;
                        fields.insert(name, value);
                    }
                }
            }

            Ok(FormPayload {
                fields,
                upload,
                client_ip,
            })
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|_| invalid_body())?;
            let pairs: Vec<(String, String)> =
                serde_urlencoded::from_bytes(&bytes).map_err(|_| invalid_body())?;

            Ok(FormPayload {
                fields: pairs.into_iter().collect(),
                upload: None,
                client_ip,
            })
        }
    }
}
