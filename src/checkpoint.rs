//! Temporary checkpoint files written during deep-learning fits.
//!
//! An estimator that supports checkpoints receives the file path
//! in [`FitOptions::checkpoint`](crate::FitOptions::checkpoint),
//! saves its best state there while training,
//! and reads it back in
//! [`Estimator::restore_checkpoint`](crate::Estimator::restore_checkpoint).
//! [`save_json`] and [`load_json`] cover serde-serializable models.

use chrono::Local;
use rand::Rng;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};


const PREFIX: &str = "tmp_dl_model_checkpoint_";


/// Serialize `state` as JSON into `path`, replacing the file.
pub fn save_json<T, P>(path: P, state: &T) -> Result<()>
    where T: Serialize,
          P: AsRef<Path>,
{
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), state)?;
    Ok(())
}


/// Deserialize the JSON file at `path`.
pub fn load_json<T, P>(path: P) -> Result<T>
    where T: DeserializeOwned,
          P: AsRef<Path>,
{
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}


/// A checkpoint path that lives as long as one `fit`.
///
/// The name carries a timestamp and a random suffix,
/// so concurrent fits do not collide.
/// The file is removed when this value is dropped;
/// a file that is already gone is fine.
#[derive(Debug)]
pub(crate) struct CheckpointFile {
    path: PathBuf,
}


impl CheckpointFile {
    pub(crate) fn new<P: AsRef<Path>>(dir: P) -> Self {
        let now = Local::now().format("%Y_%-m_%-d_%-H_%-M");
        let suffix = rand::thread_rng().gen::<f64>();
        let name = format!("{PREFIX}{now}{suffix}.json");
        Self { path: dir.as_ref().join(name) }
    }


    pub(crate) fn path(&self) -> &Path {
        &self.path
    }


    pub(crate) fn exists(&self) -> bool {
        self.path.is_file()
    }
}


impl Drop for CheckpointFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
