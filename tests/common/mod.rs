#![allow(dead_code)]

pub mod transform_service;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use huffman_cli::{Config, FileBlob, Mode, Transfer, TransferError};
use reqwest::StatusCode;
use tokio::time;

pub fn test_config(base_url: &str) -> Config {
    Config::default()
        .with_base_url(base_url)
        .with_output_dir(std::env::temp_dir())
}

pub fn sample_file(name: &str, size: usize) -> FileBlob {
    let bytes: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    FileBlob::new(name, bytes)
}

//=================
// Scripted transfer
//=================
#[derive(Clone, Debug)]
pub enum Reply {
    Payload(Vec<u8>),
    Status(StatusCode),
    Panic,
}

/// In-memory `Transfer` that waits `delay` and then answers with `reply`.
pub struct ScriptedTransfer {
    delay: Duration,
    reply: Reply,
    calls: Mutex<Vec<(Mode, String, usize)>>,
}

impl ScriptedTransfer {
    pub fn new(delay: Duration, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            delay,
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(Mode, String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transfer for ScriptedTransfer {
    async fn submit(&self, mode: Mode, file: &FileBlob) -> Result<Bytes, TransferError> {
        self.calls
            .lock()
            .unwrap()
            .push((mode, file.name().to_string(), file.size()));
        time::sleep(self.delay).await;
        match &self.reply {
            Reply::Payload(bytes) => Ok(Bytes::from(bytes.clone())),
            Reply::Status(status) => Err(TransferError::Status {
                url: format!("scripted{}", mode.endpoint()),
                status: *status,
            }),
            Reply::Panic => panic!("scripted transfer blew up"),
        }
    }
}
