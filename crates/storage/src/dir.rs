use std::{env, fs, io, path::PathBuf, process};

use directories::ProjectDirs;

/// Resolve and create the database directory. Ephemeral databases land in a
/// per-process temp directory and are safe to discard; otherwise an explicit
/// directory wins over the platform data dir.
pub fn setup_data_dir(
    app_name: &str,
    custom_dir: Option<PathBuf>,
    ephemeral: bool,
) -> io::Result<PathBuf> {
    let data_dir = if ephemeral {
        env::temp_dir().join(format!("{app_name}-{}", process::id()))
    } else if let Some(custom_dir) = custom_dir {
        custom_dir
    } else {
        ProjectDirs::from("", "", app_name)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "no home directory for data dir")
            })?
            .data_dir()
            .to_path_buf()
    };

    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}
