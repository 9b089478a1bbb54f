//! 跨行程傳遞 [`AidGroup`] 用的扁平二進位記錄。
//!
//! 採平台 parcel 格式：little-endian `i32`；字串先寫 UTF-16 長度
//! （null 為 `-1`），接著 UTF-16LE 內容、結尾 0 與補齊到 4 bytes 的填充。
//! 記錄順序：category、AID 數量、(數量 > 0 時) 字串清單（自帶長度）、description。

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::domain::model::AidGroup;
use crate::domain::ports::Parcelable;
use crate::utils::error::{AidError, Result};

const NULL_STRING: i32 = -1;
// 空字串的長度欄位、結尾 0 與填充
const MIN_STRING_SIZE: usize = 8;

/// 從尾端寫入、從前端讀出的緩衝區
#[derive(Debug, Default, Clone)]
pub struct Parcel {
    data: BytesMut,
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: BytesMut::from(bytes),
        }
    }

    /// 尚未讀取的 bytes 數
    pub fn data_avail(&self) -> usize {
        self.data.remaining()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.put_i32_le(value);
    }

    pub fn write_string(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            self.write_i32(NULL_STRING);
            return;
        };

        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_i32(units.len() as i32);
        for unit in &units {
            self.data.put_u16_le(*unit);
        }
        self.data.put_u16_le(0);
        self.data.put_bytes(0, padding((units.len() + 1) * 2));
    }

    /// 字串清單：先寫清單長度，再逐一寫入字串
    pub fn write_string_list(&mut self, values: &[String]) {
        self.write_i32(values.len() as i32);
        for value in values {
            self.write_string(Some(value));
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        if self.data.remaining() < 4 {
            return Err(AidError::wire(format!(
                "expected 4 bytes for an i32, {} left",
                self.data.remaining()
            )));
        }
        Ok(self.data.get_i32_le())
    }

    pub fn read_string(&mut self) -> Result<Option<String>> {
        let len = self.read_i32()?;
        if len == NULL_STRING {
            return Ok(None);
        }
        if len < 0 {
            return Err(AidError::wire(format!("invalid string length {}", len)));
        }

        let len = len as usize;
        let payload = (len + 1) * 2;
        let total = payload + padding(payload);
        if self.data.remaining() < total {
            return Err(AidError::wire(format!(
                "string of {} units needs {} bytes, {} left",
                len,
                total,
                self.data.remaining()
            )));
        }

        let units: Vec<u16> = (0..len).map(|_| self.data.get_u16_le()).collect();
        if self.data.get_u16_le() != 0 {
            return Err(AidError::wire("string is missing its terminator"));
        }
        self.data.advance(padding(payload));

        String::from_utf16(&units)
            .map(Some)
            .map_err(|e| AidError::wire(format!("invalid UTF-16 string: {}", e)))
    }

    /// 讀回 [`write_string_list`](Self::write_string_list) 的內容；清單中不得有 null。
    pub fn read_string_list(&mut self) -> Result<Vec<String>> {
        let count = self.read_i32()?;
        if count <= 0 {
            return Ok(Vec::new());
        }

        let count = count as usize;
        if count > self.data_avail() / MIN_STRING_SIZE {
            return Err(AidError::wire(format!(
                "list of {} strings exceeds what {} remaining bytes can hold",
                count,
                self.data_avail()
            )));
        }

        let mut values = Vec::with_capacity(count);
        for index in 0..count {
            let value = self
                .read_string()?
                .ok_or_else(|| AidError::wire(format!("list entry #{} is null", index)))?;
            values.push(value);
        }
        Ok(values)
    }
}

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

impl Parcelable for AidGroup {
    fn write_to_parcel(&self, dest: &mut Parcel) {
        dest.write_string(Some(self.category()));
        dest.write_i32(self.aids().len() as i32);
        if !self.aids().is_empty() {
            dest.write_string_list(self.aids());
        }
        dest.write_string(self.description());
    }

    fn create_from_parcel(source: &mut Parcel) -> Result<Self> {
        let category = source
            .read_string()?
            .ok_or_else(|| AidError::wire("category is null"))?;

        let count = source.read_i32()?;
        let mut aids = Vec::new();
        if count > 0 {
            aids = source.read_string_list()?;
            if aids.len() != count as usize {
                return Err(AidError::wire(format!(
                    "AID count {} does not match list length {}",
                    count,
                    aids.len()
                )));
            }
        }

        let description = source.read_string()?;
        Ok(AidGroup::new(aids, category, description))
    }
}

impl AidGroup {
    pub fn to_parcel_bytes(&self) -> Bytes {
        let mut parcel = Parcel::new();
        self.write_to_parcel(&mut parcel);
        parcel.into_bytes()
    }

    pub fn from_parcel_bytes(bytes: &[u8]) -> Result<Self> {
        let mut parcel = Parcel::from_bytes(bytes);
        let group = Self::create_from_parcel(&mut parcel)?;
        if parcel.data_avail() > 0 {
            tracing::debug!("{} trailing bytes after AID group record", parcel.data_avail());
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_layout() {
        let mut parcel = Parcel::new();
        parcel.write_string(Some("ab"));
        let bytes = parcel.into_bytes();
        // 長度 2、'a'、'b'、結尾 0：4 + 6 bytes，補齊到 12
        assert_eq!(&bytes[..], &[2u8, 0, 0, 0, b'a', 0, b'b', 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_null_and_empty_strings_differ() {
        let mut parcel = Parcel::new();
        parcel.write_string(None);
        parcel.write_string(Some(""));
        assert_eq!(parcel.data_avail(), 4 + MIN_STRING_SIZE);

        assert_eq!(parcel.read_string().unwrap(), None);
        assert_eq!(parcel.read_string().unwrap(), Some(String::new()));
        assert_eq!(parcel.data_avail(), 0);
    }

    #[test]
    fn test_non_ascii_string() {
        let mut parcel = Parcel::new();
        parcel.write_string(Some("Zahlung €"));
        parcel.write_i32(7);
        assert_eq!(parcel.read_string().unwrap().as_deref(), Some("Zahlung €"));
        assert_eq!(parcel.read_i32().unwrap(), 7);
    }

    #[test]
    fn test_truncated_input() {
        let mut parcel = Parcel::from_bytes(&[5, 0, 0, 0, b'a', 0]);
        assert!(matches!(parcel.read_string(), Err(AidError::Wire { .. })));

        let mut parcel = Parcel::from_bytes(&[1, 0]);
        assert!(parcel.read_i32().is_err());
    }

    #[test]
    fn test_record_field_order() {
        let group = AidGroup::without_description(vec!["F0".to_string()], "other");
        let mut parcel = Parcel::from_bytes(&group.to_parcel_bytes());

        assert_eq!(parcel.read_string().unwrap().as_deref(), Some("other"));
        assert_eq!(parcel.read_i32().unwrap(), 1);
        assert_eq!(parcel.read_i32().unwrap(), 1);
        assert_eq!(parcel.read_string().unwrap().as_deref(), Some("F0"));
        assert_eq!(parcel.read_string().unwrap(), None);
        assert_eq!(parcel.data_avail(), 0);
    }

    #[test]
    fn test_zero_count_has_no_aid_entries() {
        let group = AidGroup::header("payment", Some("x".to_string()));
        let bytes = group.to_parcel_bytes();
        // category "payment" (4 + 16)、數量 (4)、沒有清單、description "x" (4 + 4)
        assert_eq!(bytes.len(), 20 + 4 + 8);
        assert_eq!(AidGroup::from_parcel_bytes(&bytes).unwrap(), group);
    }

    #[test]
    fn test_record_bytes_match_platform_layout() {
        let group = AidGroup::without_description(vec!["A1".to_string()], "other");
        let bytes = group.to_parcel_bytes();
        let mut expected: Vec<u8> = Vec::new();
        // category "other"
        expected.extend_from_slice(&[5, 0, 0, 0, b'o', 0, b't', 0, b'h', 0, b'e', 0, b'r', 0, 0, 0]);
        // AID 數量與清單長度
        expected.extend_from_slice(&[1, 0, 0, 0, 1, 0, 0, 0]);
        // "A1"
        expected.extend_from_slice(&[2, 0, 0, 0, b'A', 0, b'1', 0, 0, 0, 0, 0]);
        // description 為 null
        expected.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[..], expected.as_slice());
        assert_eq!(AidGroup::from_parcel_bytes(&bytes).unwrap(), group);
    }

    #[test]
    fn test_count_must_match_list_length() {
        let mut parcel = Parcel::new();
        parcel.write_string(Some("other"));
        parcel.write_i32(2);
        parcel.write_string_list(&["A1".to_string()]);
        parcel.write_string(None);
        assert!(matches!(
            AidGroup::create_from_parcel(&mut parcel),
            Err(AidError::Wire { .. })
        ));
    }
}
