//! BraTS 3D MRI scan/label 数据集.
//!
//! 提供 "长度 + 按位置取样" 的数据集协议, 以及迭代器风格的数据集获取模式.

use super::{Sample, SampleIndex};
use crate::transform::{add_channel_axis, normalize_by_max, remap_training_labels};
use crate::{DatasetConfig, Error, Idx3d, Modality, MriLabel, MriScan, Result, ZeroMaxPolicy};
use std::fmt;
use std::path::{Path, PathBuf};

/// 样本级变换钩子. 在归一化和标签重映射之后, 返回样本之前调用.
pub type Transform = fn(&mut Sample);

/// BraTS 3D 数据集: 样本索引 + 按需加载.
///
/// 构造后只读; 每次加载都重新读取磁盘文件, 不做任何缓存.
/// 各次加载互不共享状态, 因此可以在多个线程中并发调用.
#[derive(Clone)]
pub struct BratsDataset3d {
    index: SampleIndex,
    config: DatasetConfig,
    transform: Option<Transform>,
}

impl fmt::Debug for BratsDataset3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BratsDataset3d")
            .field("index", &self.index)
            .field("config", &self.config)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl BratsDataset3d {
    /// 以 BraTS 2020 训练集的默认配置打开 `root` 下的数据集.
    ///
    /// `root` 不存在或不是目录时返回 [`Error::RootNotFound`].
    #[inline]
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_config(root, DatasetConfig::default())
    }

    /// 以指定配置打开 `root` 下的数据集.
    ///
    /// 若命名规则中某个模态后缀与分割标签后缀冲突, 返回
    /// [`Error::ReservedModality`].
    pub fn with_config<P: AsRef<Path>>(root: P, config: DatasetConfig) -> Result<Self> {
        config.naming.validate()?;
        let index = SampleIndex::new(root)?;
        Ok(Self {
            index,
            config,
            transform: None,
        })
    }

    /// 设置样本级变换钩子.
    #[inline]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// 样本索引.
    #[inline]
    pub fn index(&self) -> &SampleIndex {
        &self.index
    }

    /// 加载配置.
    #[inline]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// 样本个数, 即根目录下一级子目录的个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// 是否没有样本?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 以配置中的默认模态加载位置 `pos` 处的样本.
    #[inline]
    pub fn get(&self, pos: usize) -> Result<Sample> {
        self.load(pos, self.config.default_modality)
    }

    /// 解析位置 `pos` 处样本的 (扫描, 标签) 文件路径. 不检查文件是否存在.
    pub fn sample_paths(&self, pos: usize, modality: Modality) -> Result<(PathBuf, PathBuf)> {
        let dir = self.index.checked_dir(pos)?;
        let ordinal = SampleIndex::ordinal(pos);
        let naming = &self.config.naming;
        Ok((
            dir.join(naming.scan_file_name(ordinal, modality)),
            dir.join(naming.seg_file_name(ordinal)),
        ))
    }

    /// 读取位置 `pos` 处的原始扫描和标签, 不做任何变换.
    pub fn load_raw(&self, pos: usize, modality: Modality) -> Result<(MriScan, MriLabel)> {
        let (scan_path, label_path) = self.sample_paths(pos, modality)?;
        let scan = MriScan::open(&scan_path)?;
        let label = MriLabel::open(&label_path)?;

        self.check_shape(&scan_path, scan.dim())?;
        self.check_shape(&label_path, label.dim())?;
        if scan.dim() != label.dim() {
            return Err(Error::ShapeMismatch {
                image: scan.dim(),
                label: label.dim(),
            });
        }
        Ok((scan, label))
    }

    /// 加载位置 `pos` 处 `modality` 模态的样本.
    ///
    /// 图像逐元素除以自身最大值, 标签执行 2 -> 0, 4 -> 1, 两者都添加前置通道维度.
    /// 图像最大值为 0 时的行为由 [`ZeroMaxPolicy`] 决定.
    pub fn load(&self, pos: usize, modality: Modality) -> Result<Sample> {
        let (scan, label) = self.load_raw(pos, modality)?;

        let mut image = scan.into_data();
        if normalize_by_max(&mut image).is_none() {
            let (scan_path, _) = self.sample_paths(pos, modality)?;
            match self.config.zero_max {
                ZeroMaxPolicy::Reject => return Err(Error::ZeroMaximum(scan_path)),
                ZeroMaxPolicy::PassThrough => log::warn!(
                    "image `{}` has no usable maximum, skipping normalization",
                    scan_path.display()
                ),
            }
        }

        if log::log_enabled!(log::Level::Debug) {
            let [bg, ncr, ed, et] = label.numeric_statistics();
            log::debug!("sample {pos}: label voxels bg={bg} ncr={ncr} ed={ed} et={et}");
        }
        let mut label = label.into_data();
        remap_training_labels(&mut label);

        let mut sample = Sample {
            image: add_channel_axis(image),
            label: add_channel_axis(label),
        };
        if let Some(transform) = self.transform {
            transform(&mut sample);
        }
        Ok(sample)
    }

    /// 同 [`BratsDataset3d::load`], 但模态以字符串给出.
    ///
    /// 模态名先于位置检查: `"seg"` 对任何 `pos` 都返回 [`Error::ReservedModality`].
    #[inline]
    pub fn load_str(&self, pos: usize, modality: &str) -> Result<Sample> {
        let modality: Modality = modality.parse()?;
        self.load(pos, modality)
    }

    /// 获取按位置升序迭代全部样本的加载器.
    #[inline]
    pub fn iter(&self, modality: Modality) -> SampleLoader<'_> {
        self.loader(0..self.len(), modality)
    }

    /// 获取按 `positions` 给定顺序迭代样本的加载器.
    /// 越界位置会在迭代到时产生 [`Error::PositionOutOfRange`].
    pub fn loader<I: IntoIterator<Item = usize>>(
        &self,
        positions: I,
        modality: Modality,
    ) -> SampleLoader<'_> {
        let mut data: Vec<usize> = positions.into_iter().collect();
        data.reverse();
        SampleLoader {
            dataset: self,
            modality,
            data_rev: data,
        }
    }

    fn check_shape(&self, path: &Path, found: Idx3d) -> Result<()> {
        match self.config.expected_shape {
            Some(expected) if expected != found => Err(Error::UnexpectedShape {
                path: path.to_owned(),
                expected,
                found,
            }),
            _ => Ok(()),
        }
    }
}

/// 3D MRI 样本加载器.
#[derive(Debug)]
pub struct SampleLoader<'a> {
    dataset: &'a BratsDataset3d,
    modality: Modality,
    data_rev: Vec<usize>,
}

impl Iterator for SampleLoader<'_> {
    type Item = (usize, Result<Sample>);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.data_rev.pop()?;
        Some((pos, self.dataset.load(pos, self.modality)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.data_rev.len(), Some(self.data_rev.len()))
    }
}

impl ExactSizeIterator for SampleLoader<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.data_rev.len()
    }
}
