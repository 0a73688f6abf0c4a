//! Vendor prefixes.

#![allow(non_upper_case_globals)]

use crate::error::{Error, PrinterErrorKind};
use crate::printer::Printer;
use crate::traits::ToCss;
use bitflags::bitflags;

bitflags! {
  /// A vendor prefix on an at-rule name, such as the `-webkit` in
  /// `@-webkit-keyframes`.
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct VendorPrefix: u8 {
    /// No vendor prefix.
    const None   = 0b00000001;
    /// The `-webkit` vendor prefix.
    const WebKit = 0b00000010;
    /// The `-moz` vendor prefix.
    const Moz    = 0b00000100;
    /// The `-ms` vendor prefix.
    const Ms     = 0b00001000;
    /// The `-o` vendor prefix.
    const O      = 0b00010000;
  }
}

impl Default for VendorPrefix {
  fn default() -> VendorPrefix {
    VendorPrefix::None
  }
}

impl VendorPrefix {
  /// Splits a possibly-prefixed at-keyword name into its prefix and the
  /// unprefixed remainder: `-webkit-keyframes` becomes
  /// (`WebKit`, `"keyframes"`).
  pub fn strip(name: &str) -> (VendorPrefix, &str) {
    for (text, prefix) in [
      ("-webkit-", VendorPrefix::WebKit),
      ("-moz-", VendorPrefix::Moz),
      ("-ms-", VendorPrefix::Ms),
      ("-o-", VendorPrefix::O),
    ] {
      if name.len() > text.len() && name.as_bytes()[..text.len()].eq_ignore_ascii_case(text.as_bytes()) {
        return (prefix, &name[text.len()..]);
      }
    }
    (VendorPrefix::None, name)
  }

  pub fn as_str(&self) -> &'static str {
    match *self {
      VendorPrefix::WebKit => "-webkit-",
      VendorPrefix::Moz => "-moz-",
      VendorPrefix::Ms => "-ms-",
      VendorPrefix::O => "-o-",
      _ => "",
    }
  }
}

impl ToCss for VendorPrefix {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str(self.as_str())
  }
}
