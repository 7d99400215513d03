use std::path::{is_separator, PathBuf, MAIN_SEPARATOR};

use clap::Parser;

pub const USAGE: &str = "You must supply a bucket name (-b BUCKET) and file name (-f FILE)";

/// s3put - upload a single file to an S3 bucket
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The bucket to upload the file to
    #[arg(short = 'b', long = "bucket", default_value = "")]
    pub bucket: String,
    /// The file to upload
    #[arg(short = 'f', long = "file", default_value = "")]
    pub file: String,
    /// The object key to upload to (defaults to the file's base name)
    #[arg(short = 'd', long = "dest", default_value = "")]
    pub dest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub source: PathBuf,
}

impl Args {
    /// Returns `None` when the bucket or source file is missing.
    pub fn into_request(self) -> Option<UploadRequest> {
        if self.bucket.is_empty() || self.file.is_empty() {
            return None;
        }
        let key = if self.dest.is_empty() {
            base_name(&self.file)
        } else {
            self.dest
        };
        Some(UploadRequest {
            bucket: self.bucket,
            key,
            source: PathBuf::from(self.file),
        })
    }
}

/// Last path element, trailing separators ignored. `"."` for an empty path and
/// a lone separator for a path made only of separators.
fn base_name(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return MAIN_SEPARATOR.to_string();
    }
    trimmed
        .rsplit(is_separator)
        .next()
        .unwrap_or(trimmed)
        .to_owned()
}
