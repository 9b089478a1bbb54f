use crate::codec::parcel::Parcel;
use crate::utils::error::Result;

/// 任何帶有 AID 群組欄位的實體，透過公開存取子讀取
pub trait AidGroupView {
    fn category(&self) -> &str;
    fn aids(&self) -> &[String];
    fn description(&self) -> Option<&str>;
}

/// 以扁平二進位記錄跨行程傳遞的型別
pub trait Parcelable: Sized {
    fn write_to_parcel(&self, dest: &mut Parcel);
    fn create_from_parcel(source: &mut Parcel) -> Result<Self>;
}
