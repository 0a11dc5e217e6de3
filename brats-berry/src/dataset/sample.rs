use crate::Result;
use ndarray::Array4;
use ndarray_npy::NpzWriter;
use std::fs::File;
use std::path::Path;

/// 交给训练循环的一条记录: 归一化后的图像与重映射后的标签.
///
/// 两者形状均为 `(1, x, y, z)`, 对 BraTS 即 `(1, 240, 240, 155)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// 单模态图像, 已按最大值归一化.
    pub image: Array4<f32>,

    /// 分割标签, 已执行 2 -> 0, 4 -> 1.
    pub label: Array4<f32>,
}

impl Sample {
    /// 拆分为 `(image, label)`.
    #[inline]
    pub fn into_pair(self) -> (Array4<f32>, Array4<f32>) {
        (self.image, self.label)
    }

    /// 图像形状.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.image.shape()
    }

    /// 以 `image.npy` 和 `label.npy` 两个条目写出未压缩的 npz 归档.
    pub fn save_npz<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| crate::Error::io(path, e))?;
        let mut npz = NpzWriter::new(file);
        npz.add_array("image.npy", &self.image)?;
        npz.add_array("label.npy", &self.label)?;
        npz.finish()?;
        Ok(())
    }
}

impl From<Sample> for (Array4<f32>, Array4<f32>) {
    #[inline]
    fn from(s: Sample) -> Self {
        s.into_pair()
    }
}
