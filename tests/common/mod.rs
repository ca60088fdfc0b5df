//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

use persista::{Logger, Persista};
use serde::{Deserialize, Serialize};
use tracing::Level;

// ─── State types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub dashboard_id: u32,
    pub user_name: String,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub fault: Option<Fault>,
    #[serde(skip)]
    pub is_updating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: u32,
    pub driver_name: String,
    pub power_level: i32,
    pub lat: i32,
    pub long: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fault {
    Unknown,
    Security,
    Io,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoreState {
    pub data: bool,
}

/// JSON can't encode maps with tuple keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    pub grid_id: u32,
    pub cells: HashMap<(u8, u8), String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateContainingLocation {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    NewYork,
    Tokyo,
    European(EuropeanLocation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EuropeanLocation {
    London,
    Paris,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nested<T> {
    #[serde(default)]
    pub nested: Option<Box<Nested<T>>>,
    #[serde(default)]
    pub value: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SealedGeneric<T> {
    A { value: T },
    B { value: T },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SealedGenericNested<T> {
    A { list: Vec<SealedGenericNested<T>> },
    B { value: Option<T> },
}

// ─── Sample values ─────────────────────────────────────────

pub fn dashboard_1() -> DashboardState {
    DashboardState {
        dashboard_id: 1,
        user_name: "erdo".to_string(),
        drivers: Vec::new(),
        fault: None,
        is_updating: false,
    }
}

pub fn dashboard_2() -> DashboardState {
    DashboardState {
        dashboard_id: 2,
        user_name: "odre".to_string(),
        drivers: vec![Driver {
            driver_id: 99,
            driver_name: "francis".to_string(),
            power_level: 100,
            lat: 123,
            long: 456,
        }],
        fault: None,
        is_updating: false,
    }
}

pub fn dashboard_3() -> DashboardState {
    DashboardState {
        dashboard_id: 3,
        user_name: "uName".to_string(),
        drivers: Vec::new(),
        fault: Some(Fault::Security),
        is_updating: false,
    }
}

pub fn grid(id: u32) -> GridState {
    let mut cells = HashMap::new();
    cells.insert((0, 0), "origin".to_string());
    GridState { grid_id: id, cells }
}

pub fn nested(value: &str) -> Nested<String> {
    Nested {
        nested: Some(Box::new(Nested {
            nested: Some(Box::new(Nested {
                nested: None,
                value: Some(value.to_string()),
            })),
            value: None,
        })),
        value: None,
    }
}

// ─── Engine helpers ────────────────────────────────────────

pub fn create_persista(data_path: &Path, strict_mode: bool) -> Persista {
    Persista::builder(data_path)
        .strict_mode(strict_mode)
        .silent()
        .build()
        .unwrap()
}

pub fn create_logged_persista(data_path: &Path, strict_mode: bool) -> (Persista, RecordingLogger) {
    let logger = RecordingLogger::default();
    let persista = Persista::builder(data_path)
        .strict_mode(strict_mode)
        .logger(logger.clone())
        .build()
        .unwrap();
    (persista, logger)
}

// ─── Recording logger ──────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Call {
    pub level: Level,
    pub message: String,
    pub cause: Option<String>,
}

/// Keeps every call so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingLogger {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn at(&self, level: Level) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.level == level).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.calls.lock().unwrap().push(Call {
            level,
            message: message.to_string(),
            cause: cause.map(|e| e.to_string()),
        });
    }
}
