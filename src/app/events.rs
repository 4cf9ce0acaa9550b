//! Inbound display events.
//!
//! The display blank notifier hands over raw framebuffer blank codes.
//! Only full power-down counts as blanked; unblank and the "normal"
//! (backlight-dimmed) level count as on. The vsync/hsync suspend levels
//! are ignored and leave the policy untouched.

/// A display transition the interrupt policy reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankEvent {
    Unblank,
    Normal,
    Powerdown,
}

const FB_BLANK_UNBLANK: i32 = 0;
const FB_BLANK_NORMAL: i32 = 1;
const FB_BLANK_POWERDOWN: i32 = 4;

impl BlankEvent {
    /// Map a framebuffer blank code. `None` for levels the policy ignores.
    pub fn from_fb_code(code: i32) -> Option<Self> {
        match code {
            FB_BLANK_UNBLANK => Some(Self::Unblank),
            FB_BLANK_NORMAL => Some(Self::Normal),
            FB_BLANK_POWERDOWN => Some(Self::Powerdown),
            _ => None,
        }
    }

    pub fn is_blanked(self) -> bool {
        matches!(self, Self::Powerdown)
    }
}
