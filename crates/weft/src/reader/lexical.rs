use std::cell::Cell;
use std::rc::Rc;

use super::{IntoReader, Reader};
use crate::error::ReadError;
use crate::scanner::Scanner;

/// A store-valued reader for bool literals; see
/// [`Scanner::read_bool`][crate::Scanner::read_bool] for the formats.
pub struct BoolReader {
    value: Cell<bool>,
    format: String,
}

impl BoolReader {
    /// The value of the last successful read.
    pub fn value(&self) -> bool {
        self.value.get()
    }
}

impl Reader for BoolReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let v = sca.read_bool(&self.format)?;
        self.value.set(v);
        Ok(())
    }

    fn what(&self) -> String {
        if self.format.is_empty() {
            "bool".to_string()
        } else {
            format!("bool({})", self.format)
        }
    }
}

/// Reads a bool value and stores it on the reader.
pub fn boolean(format: &str) -> Rc<BoolReader> {
    Rc::new(BoolReader {
        value: Cell::new(false),
        format: format.to_string(),
    })
}

impl IntoReader for Rc<BoolReader> {
    fn into_reader(self) -> Rc<dyn Reader> {
        self
    }
}

/// A store-valued reader for signed integers; see
/// [`Scanner::read_int`][crate::Scanner::read_int] for base, size and
/// overflow-stop semantics.
pub struct IntReader {
    value: Cell<i64>,
    base: u32,
    bit_size: u32,
}

impl IntReader {
    /// The value of the last successful read.
    pub fn value(&self) -> i64 {
        self.value.get()
    }
}

impl Reader for IntReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let v = sca.read_int(self.base, self.bit_size)?;
        self.value.set(v);
        Ok(())
    }

    fn what(&self) -> String {
        format!("int{}", self.bit_size)
    }
}

/// Reads a signed integer value and stores it on the reader.
pub fn int(base: u32, bit_size: u32) -> Rc<IntReader> {
    Rc::new(IntReader {
        value: Cell::new(0),
        base,
        bit_size,
    })
}

impl IntoReader for Rc<IntReader> {
    fn into_reader(self) -> Rc<dyn Reader> {
        self
    }
}

/// A store-valued reader for unsigned integers.
pub struct UintReader {
    value: Cell<u64>,
    base: u32,
    bit_size: u32,
}

impl UintReader {
    /// The value of the last successful read.
    pub fn value(&self) -> u64 {
        self.value.get()
    }
}

impl Reader for UintReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let v = sca.read_uint(self.base, self.bit_size)?;
        self.value.set(v);
        Ok(())
    }

    fn what(&self) -> String {
        format!("uint{}", self.bit_size)
    }
}

/// Reads an unsigned integer value and stores it on the reader.
pub fn uint(base: u32, bit_size: u32) -> Rc<UintReader> {
    Rc::new(UintReader {
        value: Cell::new(0),
        base,
        bit_size,
    })
}

impl IntoReader for Rc<UintReader> {
    fn into_reader(self) -> Rc<dyn Reader> {
        self
    }
}
