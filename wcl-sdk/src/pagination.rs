// ABOUTME: Cursor pagination driven by a field in each extracted response page
// ABOUTME: Detects continuation, rebinds the cursor variable and merges page data

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::Result;
use crate::error::WclError;
use crate::query::Query;

/// Pagination settings attached to a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginator {
    /// Field of the extracted body holding the next cursor.
    #[serde(default)]
    pub pagination_field: Option<String>,
    /// Query variable the cursor is written to.
    #[serde(default)]
    pub overrides: Option<String>,
    #[serde(default)]
    pub cacheable: bool,
}

impl Paginator {
    pub fn new(pagination_field: impl Into<String>, overrides: impl Into<String>) -> Self {
        Self {
            pagination_field: Some(pagination_field.into()),
            overrides: Some(overrides.into()),
            cacheable: false,
        }
    }

    pub fn cacheable(mut self, cacheable: bool) -> Self {
        self.cacheable = cacheable;
        self
    }

    /// True when any setting is present; a fully empty paginator never paginates.
    pub fn is_enabled(&self) -> bool {
        self.cacheable
            || self
                .pagination_field
                .as_deref()
                .is_some_and(|field| !field.is_empty())
            || self.overrides.as_deref().is_some_and(|field| !field.is_empty())
    }
}

/// JSON truthiness: null, false, zero and empty values end pagination.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

/// Cursor for the page after `body`, if the body asks for one.
pub fn next_cursor<'a>(paginator: &Paginator, body: &'a Value) -> Option<&'a Value> {
    if !paginator.is_enabled() {
        return None;
    }
    let field = paginator.pagination_field.as_deref()?;
    body.as_object()?.get(field).filter(|cursor| is_truthy(cursor))
}

/// Appends `page.data` onto `body.data`. Every other field of `body` is kept as is.
pub fn merge_page(body: &mut Value, page: Value) -> Result<()> {
    let items = match page {
        Value::Object(mut entries) => match entries.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Ok(()),
            Some(other) => {
                return Err(WclError::Pagination(format!(
                    "page `data` is not a list: {other}"
                )));
            }
        },
        _ => return Ok(()),
    };

    match body.get_mut("data") {
        Some(Value::Array(existing)) => {
            existing.extend(items);
            Ok(())
        }
        _ => Err(WclError::Pagination(
            "first page has no `data` list to merge into".to_string(),
        )),
    }
}

/// Bookkeeping for one multi-page walk.
#[derive(Debug)]
pub struct PageWalker {
    max_pages: usize,
    pages: usize,
    seen: HashSet<String>,
}

impl PageWalker {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            pages: 1,
            seen: HashSet::new(),
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Rebinds the cursor variable on `query` for the next round trip.
    pub fn advance(&mut self, query: &mut Query, cursor: Value) -> Result<()> {
        let Some(variable) = query
            .paginator
            .overrides
            .clone()
            .filter(|name| !name.is_empty())
        else {
            return Err(WclError::Configuration(
                "pagination field is set but `overrides` names no variable".to_string(),
            ));
        };

        if !self.seen.insert(cursor.to_string()) {
            return Err(WclError::Pagination(format!(
                "cursor {cursor} was returned twice"
            )));
        }
        if self.pages >= self.max_pages {
            return Err(WclError::Pagination(format!(
                "stopped after {} pages",
                self.max_pages
            )));
        }

        self.pages += 1;
        log::debug!("fetching page {} with {variable} = {cursor}", self.pages);
        query.update(variable, cursor);
        Ok(())
    }
}
