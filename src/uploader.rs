use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use regex::Regex;

use crate::domain::{Receipt, Tag};
use crate::error::ScivaultError;

pub const UPLOAD_TOKEN: &str = "solana";

pub trait UploadClient: Send + Sync {
    fn upload(&self, payload: &[u8], tags: &[Tag]) -> Result<Receipt, ScivaultError>;
}

#[derive(Debug)]
pub struct IrysCliUploader {
    binary: PathBuf,
    wallet_key: String,
}

impl IrysCliUploader {
    pub fn new(wallet_key: &str) -> Result<Self, ScivaultError> {
        if wallet_key.trim().is_empty() {
            return Err(ScivaultError::MissingPrivateKey);
        }
        let binary = find_in_path("irys").ok_or_else(|| {
            ScivaultError::MissingTool("irys (install with `npm i -g @irys/cli`)".to_string())
        })?;
        Ok(Self {
            binary,
            wallet_key: wallet_key.trim().to_string(),
        })
    }
}

impl UploadClient for IrysCliUploader {
    fn upload(&self, payload: &[u8], tags: &[Tag]) -> Result<Receipt, ScivaultError> {
        let mut temp = tempfile::Builder::new()
            .prefix("scivault-payload")
            .suffix(".json")
            .tempfile()
            .map_err(|err| ScivaultError::Filesystem(err.to_string()))?;
        temp.write_all(payload)
            .map_err(|err| ScivaultError::Filesystem(err.to_string()))?;
        temp.flush()
            .map_err(|err| ScivaultError::Filesystem(err.to_string()))?;

        let mut args = vec![
            "upload".to_string(),
            temp.path().to_string_lossy().to_string(),
            "-t".to_string(),
            UPLOAD_TOKEN.to_string(),
            "-w".to_string(),
            self.wallet_key.clone(),
        ];
        if !tags.is_empty() {
            args.push("--tags".to_string());
            for tag in tags {
                args.push(tag.name.clone());
                args.push(tag.value.clone());
            }
        }

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|err| ScivaultError::UploadFailed(err.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                "irys upload exited with an error".to_string()
            } else {
                stderr
            };
            return Err(ScivaultError::UploadFailed(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_receipt_id(&stdout)
            .map(|id| Receipt { id })
            .ok_or_else(|| {
                ScivaultError::UploadFailed("no transaction id in uploader output".to_string())
            })
    }
}

// The vendor CLI reports the receipt as a gateway URL, e.g.
// "Uploaded to https://gateway.irys.xyz/8dFSygk...".
fn parse_receipt_id(output: &str) -> Option<String> {
    let url = Regex::new(r"https?://\S+/([A-Za-z0-9_-]+)\s*$").ok()?;
    for line in output.lines().rev() {
        if let Some(captures) = url.captures(line.trim()) {
            if let Some(id) = captures.get(1) {
                return Some(id.as_str().to_string());
            }
        }
    }
    None
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}
