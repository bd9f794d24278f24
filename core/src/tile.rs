use serde::{Deserialize, Serialize};

/// One of the flower colors a tile can bloom in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileColor {
    Rose,
    Tulip,
    Daisy,
    Lily,
    Orchid,
    Violet,
}

impl TileColor {
    pub const ALL: [TileColor; 6] = [
        Self::Rose,
        Self::Tulip,
        Self::Daisy,
        Self::Lily,
        Self::Orchid,
        Self::Violet,
    ];

    pub const COUNT: u8 = Self::ALL.len() as u8;

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Single letter used by the text form of a board, `A` through `F`.
    pub const fn symbol(self) -> char {
        (b'A' + self.index()) as char
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let offset = u32::from(symbol).checked_sub(u32::from('A'))?;
        Self::from_index(offset.try_into().ok()?)
    }

    pub const fn name(self) -> &'static str {
        use TileColor::*;
        match self {
            Rose => "rose",
            Tulip => "tulip",
            Daisy => "daisy",
            Lily => "lily",
            Orchid => "orchid",
            Violet => "violet",
        }
    }
}

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Tile(TileColor),
}

impl Cell {
    pub const EMPTY_SYMBOL: char = '.';

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    pub const fn color(self) -> Option<TileColor> {
        match self {
            Self::Empty => None,
            Self::Tile(color) => Some(color),
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => Self::EMPTY_SYMBOL,
            Self::Tile(color) => color.symbol(),
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        if symbol == Self::EMPTY_SYMBOL {
            Some(Self::Empty)
        } else {
            TileColor::from_symbol(symbol).map(Self::Tile)
        }
    }
}

impl From<TileColor> for Cell {
    fn from(color: TileColor) -> Self {
        Self::Tile(color)
    }
}
