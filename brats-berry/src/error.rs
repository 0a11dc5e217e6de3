//! 运行时错误.

use crate::Idx3d;
use std::io;
use std::path::{Path, PathBuf};

/// 加载, 预处理或写出数据集时的错误.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 请求了保留给分割标签的模态名 (`seg`).
    #[error("`{0}` 是分割标签的保留名, 不能作为模态请求")]
    ReservedModality(String),

    /// 未知的模态名.
    #[error("未知的模态 `{0}`, 可选值为 flair, t1, t1ce, t2")]
    UnknownModality(String),

    /// 数据集根目录不存在或不是目录.
    #[error("数据集根目录 `{}` 不存在或不是目录", .0.display())]
    RootNotFound(PathBuf),

    /// 样本位置越界.
    #[error("样本位置 {position} 越界, 样本总数为 {len}")]
    PositionOutOfRange {
        /// 请求的位置.
        position: usize,

        /// 样本总数.
        len: usize,
    },

    /// 按命名规则解析出的文件不存在.
    #[error("文件 `{}` 不存在", .0.display())]
    FileNotFound(PathBuf),

    /// 文件名不符合分割标签的命名规则.
    #[error("`{}` 不是分割标签文件", .0.display())]
    NotASegFile(PathBuf),

    /// 底层 I/O 错误.
    #[error("读写 `{}` 时发生 I/O 错误", .path.display())]
    Io {
        /// 出错的路径.
        path: PathBuf,

        /// 原始错误.
        #[source]
        source: io::Error,
    },

    /// nifti 文件无法解析或写出.
    #[error("处理 nifti 文件 `{}` 失败", .path.display())]
    Nifti {
        /// 出错的路径.
        path: PathBuf,

        /// 原始错误.
        #[source]
        source: nifti::NiftiError,
    },

    /// 文件数据不是三维体数据.
    #[error("`{}` 不是三维体数据 (维度为 {ndim})", .path.display())]
    NotAVolume {
        /// 出错的路径.
        path: PathBuf,

        /// 实际维度.
        ndim: usize,
    },

    /// 图像最大值为 0 (或不是有限值), 无法按最大值归一化.
    #[error("图像 `{}` 的最大值为 0 或非有限值, 无法归一化", .0.display())]
    ZeroMaximum(PathBuf),

    /// 扫描与标签形状不一致.
    #[error("扫描形状 {image:?} 与标签形状 {label:?} 不一致")]
    ShapeMismatch {
        /// 扫描形状.
        image: Idx3d,

        /// 标签形状.
        label: Idx3d,
    },

    /// 体数据形状与配置中的期望形状不符.
    #[error("`{}` 的形状为 {found:?}, 期望 {expected:?}", .path.display())]
    UnexpectedShape {
        /// 出错的路径.
        path: PathBuf,

        /// 期望形状.
        expected: Idx3d,

        /// 实际形状.
        found: Idx3d,
    },

    /// 写出 npz 归档失败.
    #[error("写出 npz 归档失败")]
    WriteNpz(#[from] ndarray_npy::WriteNpzError),
}

/// 本 crate 通用的 `Result` 类型.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 是否为调用参数非法类错误?
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::ReservedModality(_)
                | Self::UnknownModality(_)
                | Self::PositionOutOfRange { .. }
                | Self::NotASegFile(_)
        )
    }

    /// 是否为路径不存在类错误?
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RootNotFound(_) | Self::FileNotFound(_))
    }

    /// 将读取 `path` 时的 nifti 错误包装为本 crate 的错误.
    /// 文件不存在的情况会单独识别为 [`Error::FileNotFound`].
    pub(crate) fn from_nifti(path: &Path, source: nifti::NiftiError) -> Self {
        match source {
            nifti::NiftiError::Io(e) if e.kind() == io::ErrorKind::NotFound => {
                Self::FileNotFound(path.to_owned())
            }
            source => Self::Nifti {
                path: path.to_owned(),
                source,
            },
        }
    }

    #[inline]
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source,
        }
    }

    /// 将读取根目录 `path` 元数据时的 I/O 错误包装为本 crate 的错误.
    /// 只有 `NotFound` 视为 [`Error::RootNotFound`], 其余 (如权限不足) 保留为 [`Error::Io`].
    pub(crate) fn from_root_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::RootNotFound(path.to_owned())
        } else {
            Self::io(path, source)
        }
    }
}
