use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;

const COOKIE_NAME: &str = "flash";

/// One-shot notice shown on the page after a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Added,
    Updated,
    Deleted,
    GenreAdded,
}

impl Flash {
    fn code(self) -> &'static str {
        match self {
            Flash::Added => "added",
            Flash::Updated => "updated",
            Flash::Deleted => "deleted",
            Flash::GenreAdded => "genre_added",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "added" => Some(Flash::Added),
            "updated" => Some(Flash::Updated),
            "deleted" => Some(Flash::Deleted),
            "genre_added" => Some(Flash::GenreAdded),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::Added => "Recommendation added successfully!",
            Flash::Updated => "Recommendation updated successfully!",
            Flash::Deleted => "Recommendation deleted successfully!",
            Flash::GenreAdded => "Genre added successfully!",
        }
    }

    /// CSS category of the notice
    pub fn category(self) -> &'static str {
        match self {
            Flash::Deleted => "danger",
            _ => "success",
        }
    }

    /// Reads the notice from the request's `Cookie` headers
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .and_then(|(_, code)| Flash::from_code(code.trim()))
    }
}

#[derive(Debug, Serialize)]
pub struct FlashView {
    pub message: &'static str,
    pub category: &'static str,
}

/// Redirects to `location` and leaves `flash` for the next page
pub fn redirect_with(location: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(location).into_response();
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        COOKIE_NAME,
        flash.code()
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// The notice left by the previous response, if any
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomingFlash(pub Option<Flash>);

#[async_trait]
impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(Flash::from_headers(&parts.headers)))
    }
}

impl IncomingFlash {
    pub fn view(&self) -> Option<FlashView> {
        self.0.map(|flash| FlashView {
            message: flash.message(),
            category: flash.category(),
        })
    }

    /// Wraps a rendered page, expiring the cookie once the notice was shown
    pub fn page(&self, html: Html<String>) -> Response {
        let mut response = html.into_response();
        if self.0.is_some() {
            response.headers_mut().append(
                SET_COOKIE,
                HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
            );
        }
        response
    }
}
