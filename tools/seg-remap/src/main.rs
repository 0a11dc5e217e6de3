//! 对 BraTS 训练集执行批量标签二值化, 为每个 `*_seg.nii` 写出 `*_seg_mod.nii`.
//!
//! 数据集位置由 `$BRATS_TRAIN_DIR` 指定, 缺省为 `$HOME/dataset` 下的 BraTS 2020 训练集.
//! 日志级别可通过 `$RUST_LOG` 调整.

mod loader;

use brats_berry::remap;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::error::Error as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("logger init error: {e}");
    }

    let Some(dir) = loader::train_dir_from_env_or_home() else {
        log::error!("cannot locate home directory, set `$BRATS_TRAIN_DIR`");
        return ExitCode::FAILURE;
    };

    log::info!("remapping segmentation labels under `{}`...", dir.display());
    match remap::par_remap_all_labels(&dir) {
        Ok(n) => {
            log::info!("done, {n} files written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            let mut source = e.source();
            while let Some(s) = source {
                log::error!("  caused by: {s}");
                source = s.source();
            }
            ExitCode::FAILURE
        }
    }
}
