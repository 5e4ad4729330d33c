use app::rights::{patch, PatchParams};
use std::path::PathBuf;
use utils::app_config::AppConfig;
use utils::error::{Error, Result};

pub async fn patch_cmd(dir_path: PathBuf) -> Result<()> {
    let config = AppConfig::fetch()?;
    let params = PatchParams {
        dir_path,
        layout: config.layout,
    };

    let summary = patch(params).await?;
    println!("{}", summary);

    if summary.has_failures() {
        return Err(Error::new(format!(
            "{} role file(s) could not be patched",
            summary.failed.len()
        )));
    }

    Ok(())
}
