use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{Author, ChatLog};

/// File name of the exported transcript
pub const EXPORT_FILE_NAME: &str = "chat.txt";

/// Plain-text transcript, one line per message in document order
pub fn export_text(log: &ChatLog) -> String {
    let mut content = String::new();
    for message in log.iter() {
        let prefix = match message.author {
            Author::User => "User: ",
            Author::Assistant => "Bot: ",
        };
        content.push_str(&format!("{} {}\n", prefix, message.text));
    }
    content
}

/// Write the transcript into `dir` and return the file written
pub fn export_to(log: &ChatLog, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, export_text(log))?;
    tracing::info!("exported {} messages to {:?}", log.len(), path);
    Ok(path)
}
