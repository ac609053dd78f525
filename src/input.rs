use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// All console inputs are active low: a cleared bit means pressed / selected.

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Joystick:u8
    {
        const p0_right = 0b1000_0000;
        const p0_left  = 0b0100_0000;
        const p0_down  = 0b0010_0000;
        const p0_up    = 0b0001_0000;
        const p1_right = 0b0000_1000;
        const p1_left  = 0b0000_0100;
        const p1_down  = 0b0000_0010;
        const p1_up    = 0b0000_0001;
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ConsoleSwitches:u8
    {
        const right_difficulty = 0b1000_0000;
        const left_difficulty  = 0b0100_0000;
        const color            = 0b0000_1000;
        const select           = 0b0000_0010;
        const reset            = 0b0000_0001;
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FireButton:u8
    {
        const released = 0b1000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    P0,
    P1,
}

/// Decoded joystick of one player, `true` meaning held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stick {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Raw register values the host samples once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub swcha: u8,
    pub swchb: u8,
    pub inpt4: u8,
    pub inpt5: u8,
}

impl InputState {
    /// Nothing pressed, colour TV, both difficulties on B.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            swcha: Joystick::all().bits(),
            swchb: (ConsoleSwitches::reset | ConsoleSwitches::select | ConsoleSwitches::color).bits(),
            inpt4: FireButton::released.bits(),
            inpt5: FireButton::released.bits(),
        }
    }

    #[must_use]
    pub fn joystick(&self) -> Joystick {
        Joystick::from_bits_truncate(self.swcha)
    }

    #[must_use]
    pub fn switches(&self) -> ConsoleSwitches {
        ConsoleSwitches::from_bits_truncate(self.swchb)
    }

    #[must_use]
    pub fn stick(&self, player: Player) -> Stick {
        let j = self.joystick();
        match player {
            Player::P0 => Stick {
                up: !j.contains(Joystick::p0_up),
                down: !j.contains(Joystick::p0_down),
                left: !j.contains(Joystick::p0_left),
                right: !j.contains(Joystick::p0_right),
                fire: self.inpt4 & FireButton::released.bits() == 0,
            },
            Player::P1 => Stick {
                up: !j.contains(Joystick::p1_up),
                down: !j.contains(Joystick::p1_down),
                left: !j.contains(Joystick::p1_left),
                right: !j.contains(Joystick::p1_right),
                fire: self.inpt5 & FireButton::released.bits() == 0,
            },
        }
    }

    #[must_use]
    pub fn game_reset(&self) -> bool {
        !self.switches().contains(ConsoleSwitches::reset)
    }

    #[must_use]
    pub fn game_select(&self) -> bool {
        !self.switches().contains(ConsoleSwitches::select)
    }

    #[must_use]
    pub fn color_tv(&self) -> bool {
        self.switches().contains(ConsoleSwitches::color)
    }

    /// Difficulty A is the "pro" position, bit set.
    #[must_use]
    pub fn left_difficulty_a(&self) -> bool {
        self.switches().contains(ConsoleSwitches::left_difficulty)
    }

    #[must_use]
    pub fn right_difficulty_a(&self) -> bool {
        self.switches().contains(ConsoleSwitches::right_difficulty)
    }

    /// Holds the given directions (clears their bits).
    #[must_use]
    pub fn with_joystick(mut self, pressed: Joystick) -> Self {
        self.swcha &= !pressed.bits();
        self
    }

    #[must_use]
    pub fn with_fire(mut self, player: Player) -> Self {
        match player {
            Player::P0 => self.inpt4 &= !FireButton::released.bits(),
            Player::P1 => self.inpt5 &= !FireButton::released.bits(),
        }
        self
    }

    #[must_use]
    pub fn with_switch_pressed(mut self, sw: ConsoleSwitches) -> Self {
        self.swchb &= !sw.bits();
        self
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_reads_nothing_pressed() {
        let i = InputState::idle();
        assert_eq!(i.stick(Player::P0), Stick::default());
        assert_eq!(i.stick(Player::P1), Stick::default());
        assert!(!i.game_reset());
        assert!(!i.game_select());
        assert!(i.color_tv());
        assert!(!i.left_difficulty_a());
    }

    #[test]
    fn active_low_decoding() {
        let i = InputState::idle()
            .with_joystick(Joystick::p0_left | Joystick::p1_down)
            .with_fire(Player::P1)
            .with_switch_pressed(ConsoleSwitches::reset);
        assert_eq!(i.swcha, 0b1011_1101);
        let p0 = i.stick(Player::P0);
        assert!(p0.left && !p0.right && !p0.up && !p0.down && !p0.fire);
        let p1 = i.stick(Player::P1);
        assert!(p1.down && p1.fire && !p1.up);
        assert!(i.game_reset());
        assert!(!i.game_select());
    }
}
