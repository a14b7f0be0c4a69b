//! Display attributes for text written to a window

use bitflags::bitflags;
use crossterm::style::Attribute;

use crate::error::{Error, Result};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attr: u32 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const BLINK     = 0b0001_0000;
        const REVERSE   = 0b0010_0000;
        const STANDOUT  = 0b0100_0000;
    }
}

impl Attr {
    /// Plain text
    pub const NORMAL: Attr = Attr::empty();

    /// Convert to crossterm attributes. Standout renders as reverse video.
    pub fn to_crossterm(self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        if self.contains(Attr::BOLD) {
            attributes.push(Attribute::Bold);
        }
        if self.contains(Attr::DIM) {
            attributes.push(Attribute::Dim);
        }
        if self.contains(Attr::ITALIC) {
            attributes.push(Attribute::Italic);
        }
        if self.contains(Attr::UNDERLINE) {
            attributes.push(Attribute::Underlined);
        }
        if self.contains(Attr::BLINK) {
            attributes.push(Attribute::SlowBlink);
        }
        if self.intersects(Attr::REVERSE | Attr::STANDOUT) {
            attributes.push(Attribute::Reverse);
        }
        attributes
    }
}

/// The attributes associated with a part of the screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttributeMask {
    value: Attr,
}

impl AttributeMask {
    /// Empty mask (NORMAL)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attr(value: Attr) -> Self {
        Self { value }
    }

    /// Raw numeric value underlying the mask
    pub fn value(&self) -> u32 {
        self.value.bits()
    }

    /// Replace the raw value. Bits outside the known attributes are rejected.
    pub fn set_value(&mut self, value: u32) -> Result<()> {
        self.value = Attr::from_bits(value).ok_or(Error::InvalidAttribute(value))?;
        Ok(())
    }

    /// Flags as a typed set
    pub fn attr(&self) -> Attr {
        self.value
    }

    /// Whether BLINK is set
    pub fn blink(&self) -> bool {
        self.value.contains(Attr::BLINK)
    }

    /// Set or clear BLINK
    pub fn set_blink(&mut self, on: bool) -> &mut Self {
        self.value.set(Attr::BLINK, on);
        self
    }

    /// Whether BOLD is set
    pub fn bold(&self) -> bool {
        self.value.contains(Attr::BOLD)
    }

    /// Set or clear BOLD
    pub fn set_bold(&mut self, on: bool) -> &mut Self {
        self.value.set(Attr::BOLD, on);
        self
    }

    /// Whether DIM is set
    pub fn dim(&self) -> bool {
        self.value.contains(Attr::DIM)
    }

    /// Set or clear DIM
    pub fn set_dim(&mut self, on: bool) -> &mut Self {
        self.value.set(Attr::DIM, on);
        self
    }

    /// Whether STANDOUT is set. Rendered as reverse video.
    pub fn standout(&self) -> bool {
        self.value.contains(Attr::STANDOUT)
    }

    /// Set or clear STANDOUT
    pub fn set_standout(&mut self, on: bool) -> &mut Self {
        self.value.set(Attr::STANDOUT, on);
        self
    }

    /// Whether UNDERLINE is set
    pub fn underline(&self) -> bool {
        self.value.contains(Attr::UNDERLINE)
    }

    /// Set or clear UNDERLINE
    pub fn set_underline(&mut self, on: bool) -> &mut Self {
        self.value.set(Attr::UNDERLINE, on);
        self
    }
}

impl From<Attr> for AttributeMask {
    fn from(value: Attr) -> Self {
        Self::from_attr(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        let mask = AttributeMask::new();
        assert_eq!(mask.value(), Attr::NORMAL.bits());
        assert!(!mask.blink());
        assert!(!mask.bold());
        assert!(!mask.underline());
    }

    #[test]
    fn test_toggle_restores_value() {
        let mut mask = AttributeMask::from(Attr::DIM);
        let original = mask.value();
        mask.set_bold(true);
        assert!(mask.bold());
        assert_eq!(mask.value(), (Attr::DIM | Attr::BOLD).bits());
        mask.set_bold(false);
        assert_eq!(mask.value(), original);
    }

    #[test]
    fn test_flags_are_independent() {
        let mut mask = AttributeMask::new();
        mask.set_bold(true).set_bold(false).set_underline(true);
        assert!(!mask.blink());
        assert!(!mask.bold());
        assert!(mask.underline());
        assert_eq!(mask.value(), Attr::UNDERLINE.bits());

        mask.set_standout(true).set_blink(true);
        assert!(mask.standout() && mask.blink() && mask.underline());
        assert!(!mask.dim());
    }

    #[test]
    fn test_set_value_validates_bits() {
        let mut mask = AttributeMask::new();
        mask.set_value(Attr::BLINK.bits()).unwrap();
        assert!(mask.blink());
        assert!(matches!(mask.set_value(1 << 20), Err(Error::InvalidAttribute(_))));
        // Rejected value leaves the mask untouched
        assert!(mask.blink());
    }

    #[test]
    fn test_crossterm_mapping() {
        assert!(Attr::NORMAL.to_crossterm().is_empty());
        assert_eq!(
            (Attr::BOLD | Attr::STANDOUT).to_crossterm(),
            vec![Attribute::Bold, Attribute::Reverse]
        );
    }
}
