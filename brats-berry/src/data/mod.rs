use std::ops::{Index, IndexMut};
use std::path::Path;

use ndarray::{Array3, ArrayD, ArrayView, ArrayViewMut, Axis, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::consts::label::*;
use crate::{Error, Idx3d, Result};

/// `NiftiHeader` 是栈上大对象, 移动该对象的开销很可观.
/// 因此我们将其分配到堆上.
type BoxedHeader = Box<NiftiHeader>;

/// 从 header 读取 `(x, y, z)` 形状.
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> Idx3d {
    let [_, x, y, z, ..] = h.dim;
    (x as usize, y as usize, z as usize)
}

/// 读取 nii 文件, 以 `f32` 返回 header 和 `(x, y, z)` 顺序的三维数据.
///
/// `scl_slope`/`scl_inter` 由 nifti 读取器自动应用.
/// 末尾长度为 1 的多余维度 (如 `(x, y, z, 1)`) 会被去除.
fn read_volume(path: &Path) -> Result<(BoxedHeader, Array3<f32>)> {
    let obj = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| Error::from_nifti(path, e))?;
    let header = Box::new(obj.header().clone());

    let data = obj
        .into_volume()
        .into_ndarray::<f32>()
        .map_err(|e| Error::from_nifti(path, e))?;
    let data = squeeze_to_3d(path, data)?;

    // nifti 数据按列优先存储, 这里统一转为行优先, 逻辑索引不变.
    let data = if data.is_standard_layout() {
        data
    } else {
        data.as_standard_layout().into_owned()
    };
    debug_assert!(data.is_standard_layout());

    log::debug!("loaded `{}` with shape {:?}", path.display(), data.dim());
    Ok((header, data))
}

fn squeeze_to_3d(path: &Path, mut data: ArrayD<f32>) -> Result<Array3<f32>> {
    while data.ndim() > 3 && data.shape()[data.ndim() - 1] == 1 {
        let last = data.ndim() - 1;
        data = data.index_axis_move(Axis(last), 0);
    }
    let ndim = data.ndim();
    data.into_dimensionality::<Ix3>()
        .map_err(|_| Error::NotAVolume {
            path: path.to_owned(),
            ndim,
        })
}

/// 3D MRI nii 文件 header 的共用属性.
pub trait NiftiHeaderAttr {
    /// 获取 header 部分.
    fn header(&self) -> &NiftiHeader;

    /// 获取 header 记录的数据形状 `(x, y, z)`.
    #[inline]
    fn shape(&self) -> Idx3d {
        get_shape_from_header(self.header())
    }

    /// 获取数据体素个数.
    #[inline]
    fn size(&self) -> usize {
        let (x, y, z) = self.shape();
        x * y * z
    }

    /// 获取单个体素分辨率 `[x, y, z]`, 以毫米为单位.
    #[inline]
    fn pix_dim(&self) -> [f64; 3] {
        let [_, x, y, z, ..] = self.header().pixdim;
        [x as f64, y as f64, z as f64]
    }

    /// 获取体素的实际体积值, 以立方毫米为单位.
    #[inline]
    fn voxel(&self) -> f64 {
        self.pix_dim().iter().product()
    }

    /// 获取 sform 仿射矩阵的前三行.
    #[inline]
    fn srow(&self) -> [[f32; 4]; 3] {
        let h = self.header();
        [h.srow_x, h.srow_y, h.srow_z]
    }
}

/// nii 格式 3D MRI 扫描 (单一模态), 包括 header 和体素强度. 强度以 `f32` 保存.
#[derive(Debug, Clone)]
pub struct MriScan {
    header: BoxedHeader,
    data: Array3<f32>,
}

impl NiftiHeaderAttr for MriScan {
    #[inline]
    fn header(&self) -> &NiftiHeader {
        &self.header
    }
}

impl Index<Idx3d> for MriScan {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx3d> for MriScan {
    #[inline]
    fn index_mut(&mut self, index: Idx3d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl MriScan {
    /// 打开 nii 文件格式的 3D MRI 扫描. `path` 为 nii 文件的本地路径.
    ///
    /// 文件不存在时返回 [`Error::FileNotFound`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (header, data) = read_volume(path.as_ref())?;
        Ok(Self { header, data })
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, f32, Ix3> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut<'_, f32, Ix3> {
        self.data.view_mut()
    }

    /// 取出底层数据, 丢弃 header.
    #[inline]
    pub fn into_data(self) -> Array3<f32> {
        self.data
    }

    /// 实际数据形状 `(x, y, z)`.
    #[inline]
    pub fn dim(&self) -> Idx3d {
        self.data.dim()
    }
}

/// nii 格式 3D MRI 分割标签, 包括 header 和标签值. 标签值以 `f32` 保存,
/// 以便原样保留数据集中出现的任何取值.
#[derive(Debug, Clone)]
pub struct MriLabel {
    header: BoxedHeader,
    data: Array3<f32>,
}

impl NiftiHeaderAttr for MriLabel {
    #[inline]
    fn header(&self) -> &NiftiHeader {
        &self.header
    }
}

impl Index<Idx3d> for MriLabel {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx3d> for MriLabel {
    #[inline]
    fn index_mut(&mut self, index: Idx3d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl MriLabel {
    /// 打开 nii 文件格式的 3D 分割标签. `path` 为 nii 文件的本地路径.
    ///
    /// 文件不存在时返回 [`Error::FileNotFound`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (header, data) = read_volume(path.as_ref())?;
        Ok(Self { header, data })
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, f32, Ix3> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut<'_, f32, Ix3> {
        self.data.view_mut()
    }

    /// 取出底层数据, 丢弃 header.
    #[inline]
    pub fn into_data(self) -> Array3<f32> {
        self.data
    }

    /// 实际数据形状 `(x, y, z)`.
    #[inline]
    pub fn dim(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取标签的基本统计信息.
    ///
    /// 统计信息格式为: \[背景, 坏死/非增强核心, 水肿, 增强肿瘤\] 的体素数.
    /// 该操作不会统计任何其他取值.
    pub fn numeric_statistics(&self) -> [usize; 4] {
        let mut ans = [0; 4];
        for &v in self.data.iter() {
            let slot = [BRATS_BACKGROUND, BRATS_NECROTIC, BRATS_EDEMA, BRATS_ENHANCING]
                .iter()
                .position(|&l| l == v);
            if let Some(i) = slot {
                ans[i] += 1;
            }
        }
        ans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixture;

    #[test]
    fn test_open_scan_and_header() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scan.nii");
        let raw = fixture::scan_data(3);
        fixture::write_scan(&path, &raw);

        let scan = MriScan::open(&path).unwrap();
        assert_eq!(scan.dim(), fixture::SHAPE);
        assert_eq!(scan.shape(), fixture::SHAPE);
        assert_eq!(scan.size(), 6 * 5 * 4);
        assert_eq!(scan.pix_dim(), [1.5, 1.5, 2.0]);
        assert_eq!(scan.voxel(), 4.5);
        assert_eq!(scan.srow()[2], [0.0, 0.0, 2.0, -72.0]);
        assert_eq!(scan[(1, 2, 3)], raw[(1, 2, 3)]);
        assert!(scan.data().is_standard_layout());
        assert_eq!(scan.into_data(), raw);
    }

    #[test]
    fn test_open_label_statistics() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("seg.nii");
        fixture::write_label(&path, &fixture::label_data());

        let mut label = MriLabel::open(&path).unwrap();
        let raw = fixture::label_data();
        let stats = label.numeric_statistics();
        assert_eq!(stats.iter().sum::<usize>(), label.size());
        for (i, v) in [BRATS_BACKGROUND, BRATS_NECROTIC, BRATS_EDEMA, BRATS_ENHANCING]
            .into_iter()
            .enumerate()
        {
            assert_eq!(stats[i], raw.iter().filter(|p| **p == v).count());
        }

        label[(0, 0, 0)] = 3.0;
        assert_eq!(label.numeric_statistics().iter().sum::<usize>(), label.size() - 1);
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nope.nii");
        assert!(matches!(MriScan::open(&path), Err(Error::FileNotFound(p)) if p == path));
    }

    #[test]
    fn test_squeeze_trailing_axes() {
        let path = Path::new("x.nii");
        let d = ArrayD::<f32>::zeros(ndarray::IxDyn(&[2, 3, 4, 1, 1]));
        assert_eq!(squeeze_to_3d(path, d).unwrap().dim(), (2, 3, 4));

        let d = ArrayD::<f32>::zeros(ndarray::IxDyn(&[2, 3, 4, 2]));
        assert!(matches!(
            squeeze_to_3d(path, d),
            Err(Error::NotAVolume { ndim: 4, .. })
        ));

        let d = ArrayD::<f32>::zeros(ndarray::IxDyn(&[2, 3]));
        assert!(matches!(
            squeeze_to_3d(path, d),
            Err(Error::NotAVolume { ndim: 2, .. })
        ));
    }
}
