// AidGroup 的傳輸格式：XML 片段與扁平二進位記錄。

pub mod parcel;
pub mod xml;
