//! 样本索引: 数据集根目录下的一级子目录列表.

use crate::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// 数据集根目录下所有样本目录的只读列表.
///
/// 每个一级子目录是一个样本, 普通文件被忽略. 子目录按名称的字典序排序,
/// 因此同一目录在任何文件系统上得到的位置都一致. 对于 BraTS 的补零命名
/// (`BraTS20_Training_001`, ...), 位置 `pos` 恰好对应序号 `pos + 1`.
#[derive(Debug, Clone)]
pub struct SampleIndex {
    root: PathBuf,
    samples: Vec<PathBuf>,
}

impl SampleIndex {
    /// 列举 `root` 下的一级子目录.
    ///
    /// `root` 不存在或不是目录时返回 [`Error::RootNotFound`],
    /// 列举失败时返回 [`Error::Io`].
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_owned();
        ensure_root_dir(&root)?;

        let mut samples = Vec::new();
        for entry in fs::read_dir(&root).map_err(|e| Error::io(&root, e))? {
            let path = entry.map_err(|e| Error::io(&root, e))?.path();
            // 跟随符号链接.
            if path.is_dir() {
                samples.push(path);
            }
        }
        samples.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));

        log::info!("indexed {} samples under `{}`", samples.len(), root.display());
        Ok(Self { root, samples })
    }

    /// 数据集根目录.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 样本个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// 是否没有样本?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 位置 `pos` 处的样本目录. 越界时返回 `None`.
    #[inline]
    pub fn sample_dir(&self, pos: usize) -> Option<&Path> {
        self.samples.get(pos).map(PathBuf::as_path)
    }

    /// 位置 `pos` 处的样本目录名. 越界时返回 `None`.
    #[inline]
    pub fn sample_name(&self, pos: usize) -> Option<&OsStr> {
        self.sample_dir(pos)?.file_name()
    }

    /// 位置 `pos` 对应的文件名序号, 即 `pos + 1`.
    #[inline]
    pub const fn ordinal(pos: usize) -> usize {
        pos + 1
    }

    /// 按位置顺序迭代所有样本目录.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Path> {
        self.samples.iter().map(PathBuf::as_path)
    }

    /// 检查 `pos` 是否合法, 并返回对应样本目录.
    pub(crate) fn checked_dir(&self, pos: usize) -> Result<&Path> {
        self.sample_dir(pos).ok_or(Error::PositionOutOfRange {
            position: pos,
            len: self.len(),
        })
    }
}

/// 检查 `root` 是否为可访问的目录 (跟随符号链接).
///
/// 不存在或不是目录时返回 [`Error::RootNotFound`], 其他元数据错误返回 [`Error::Io`].
pub(crate) fn ensure_root_dir(root: &Path) -> Result<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::RootNotFound(root.to_owned())),
        Err(e) => Err(Error::from_root_io(root, e)),
    }
}
