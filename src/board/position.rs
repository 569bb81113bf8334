/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Deref, DerefMut},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};

use super::{Bitboard, Color, File, Piece, PieceKind, Rank, Square};

/// Castling rights of both players, packed as `KQkq` bit flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_SHORT: u8 = 0b0001;
    const WHITE_LONG: u8 = 0b0010;
    const BLACK_SHORT: u8 = 0b0100;
    const BLACK_LONG: u8 = 0b1000;

    /// No castling rights for either player.
    pub const NONE: Self = Self(0);

    /// Every castling right, as in the starting position.
    pub const ALL: Self = Self(0b1111);

    /// Parses the castling field of a FEN string, such as `KQkq` or `-`.
    pub fn from_uci(castling: &str) -> Result<Self> {
        let mut rights = 0;
        for c in castling.chars() {
            rights |= match c {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                '-' => 0,
                _ => bail!("Invalid castling rights {castling:?}: unexpected char {c:?}"),
            };
        }
        Ok(Self(rights))
    }

    /// Hands White's rights to Black and vice versa.
    #[inline(always)]
    pub const fn swapped(self) -> Self {
        Self((self.0 & 0b0011) << 2 | self.0 >> 2)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.0 & flag != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of castling rights, en passant, or move counters. If you need those, see [`Position`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// All squares occupied by a specific color.
    colors: [Bitboard; Color::COUNT],

    /// All squares occupied by a specific piece kind.
    pieces: [Bitboard; PieceKind::COUNT],

    /// Redundant mailbox to speed up [`Board::piece_at`].
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// assert_eq!(Board::new().to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            colors: [Bitboard::EMPTY_BOARD; Color::COUNT],
            pieces: [Bitboard::EMPTY_BOARD; PieceKind::COUNT],
            mailbox: [None; Square::COUNT],
        }
    }

    /// Constructs a [`Board`] from the placement field of a FEN string.
    pub fn from_fen(placements: &str) -> Result<Self> {
        let mut board = Self::new();

        if placements.matches('/').count() != 7 {
            bail!("FEN must have piece placements for all 8 ranks. Got {placements:?}");
        }

        // Reversed so that White's pieces end up at the "bottom" of the board
        for (rank, row) in placements.split('/').rev().enumerate() {
            let rank = Rank::new_unchecked(rank as u8);
            let mut file = 0u8;

            for c in row.chars() {
                if let Some(empty) = c.to_digit(10) {
                    file += empty as u8;
                    continue;
                }

                let piece = Piece::from_uci(c).with_context(|| {
                    format!("FEN placements must contain piece chars or digits. Got {c:?}")
                })?;

                if file > File::MAX {
                    bail!("Too many squares on rank {rank} of {placements:?}");
                }
                board.place(piece, Square::new(File::new_unchecked(file), rank));
                file += 1;
            }

            if file != File::COUNT as u8 {
                bail!("Rank {rank} of {placements:?} must describe exactly 8 squares");
            }
        }

        Ok(board)
    }

    /// Places the provided [`Piece`] on the supplied [`Square`], replacing any piece already there.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Piece, PieceKind, Square};
    /// let mut board = Board::new();
    /// board.place(Piece::new(Color::White, PieceKind::Knight), Square::C4);
    /// assert_eq!(board.to_fen(), "8/8/8/8/2N5/8/8/8");
    /// ```
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.take(square);
        self.colors[piece.color()].set(square);
        self.pieces[piece.kind()].set(square);
        self.mailbox[square] = Some(piece);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.mailbox[square].take()?;

        self.colors[piece.color()].clear(square);
        self.pieces[piece.kind()].clear(square);

        Some(piece)
    }

    /// Fetches the [`Piece`] on `square`, if any.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// All squares occupied by pieces of `kind`, of either color.
    #[inline(always)]
    pub const fn kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// All squares occupied by pieces of `color`.
    #[inline(always)]
    pub const fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// All occupied squares.
    #[inline(always)]
    pub const fn occupied(&self) -> Bitboard {
        self.colors[0].or(self.colors[1])
    }

    /// All squares occupied by `color`'s pieces of `kind`.
    #[inline(always)]
    pub const fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.color(color).and(self.kind(kind))
    }

    #[inline(always)]
    pub const fn pawns(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn knights(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Knight)
    }

    #[inline(always)]
    pub const fn bishops(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Bishop)
    }

    #[inline(always)]
    pub const fn rooks(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Rook)
    }

    #[inline(always)]
    pub const fn queens(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Queen)
    }

    #[inline(always)]
    pub const fn king(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::King)
    }

    /// Number of `color`'s pieces of `kind` on the board.
    #[inline(always)]
    pub const fn count(&self, color: Color, kind: PieceKind) -> i32 {
        self.pieces(color, kind).population() as i32
    }

    /// The square of `color`'s King.
    ///
    /// A board without that King yields A1; parsing a [`Position`] rules this out.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        let king = self.king(color);
        debug_assert!(
            king.population() == 1,
            "{color} must have exactly one king. Found {}",
            king.population()
        );
        king.lsb().unwrap_or_default()
    }

    /// Mirrors this [`Board`] across the horizontal axis and swaps the colors of every piece.
    pub fn mirrored(&self) -> Self {
        let mut board = Self::new();
        for square in self.occupied() {
            if let Some(piece) = self.piece_at(square) {
                board.place(piece.inverted(), square.flipped_rank());
            }
        }
        board
    }

    /// Generates the placement field of a FEN string for this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(Rank::COUNT);

        for rank in Rank::iter().rev() {
            let mut row = String::with_capacity(File::COUNT);
            let mut empty_spaces = 0;
            for file in File::iter() {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty_spaces != 0 {
                        row += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    row.push(piece.to_uci());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                row += &empty_spaces.to_string();
            }
            placements.push(row);
        }

        placements.join("/")
    }
}

impl Default for Board {
    /// The standard starting arrangement of pieces.
    fn default() -> Self {
        use PieceKind::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::new();
        for color in Color::all() {
            for (file, kind) in File::iter().zip(back_rank) {
                let back = Square::new(file, Rank::first(color));
                let front = Square::new(file, Rank::TWO.relative_to(color));
                board.place(Piece::new(color, kind), back);
                board.place(Piece::new(color, Pawn), front);
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}| ")?;

            for file in File::iter() {
                let occupant = self
                    .piece_at(Square::new(file, rank))
                    .map(|piece| piece.to_uci())
                    .unwrap_or('.');

                write!(f, "{occupant} ")?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Represents the current state of the game: the [`Board`] and the FEN metadata around it.
///
/// This is analogous to a FEN string, and possesses no way to make moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Bitboard representation of the game board.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Castling rights for each player.
    castling_rights: CastlingRights,

    /// Optional attack square for en passant.
    ep_square: Option<Square>,

    /// Plies since the last capture or pawn move.
    halfmove: usize,

    /// Number of moves since the beginning of the game.
    fullmove: usize,
}

impl Position {
    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// Missing trailing fields take their usual defaults. Each side must have exactly one King.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Position, Square};
    /// let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1").unwrap();
    /// assert_eq!(pos.side_to_move(), Color::Black);
    /// assert_eq!(pos.king_square(Color::White), Square::E1);
    /// assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_whitespace();
        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;
        let board = Board::from_fen(placements)?;

        for color in Color::all() {
            let kings = board.king(color).population();
            if kings != 1 {
                bail!("FEN {fen:?} must have exactly one {color} king. Found {kings}");
            }
        }

        let active_color = split.next().unwrap_or("w");
        let mut chars = active_color.chars();
        let side_to_move = match (chars.next(), chars.next()) {
            (Some(c), None) => Color::from_uci(c)?,
            _ => bail!("FEN side to move must be `w` or `b`. Got {active_color:?}"),
        };

        let castling_rights = CastlingRights::from_uci(split.next().unwrap_or("-"))?;

        let ep_square = match split.next().unwrap_or("-") {
            "-" => None,
            square => Some(Square::from_uci(square).context("Invalid en passant square")?),
        };

        let halfmove = split.next().unwrap_or("0");
        let halfmove = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove = split.next().unwrap_or("1");
        let fullmove = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            ep_square,
            halfmove,
            fullmove,
        })
    }

    /// Generates the FEN string of this [`Position`].
    #[inline(always)]
    pub fn to_fen(&self) -> String {
        self.to_string()
    }

    /// The [`Color`] of the player to move.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Hands the move to `color`.
    #[inline(always)]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The colour-swapped reflection of this [`Position`].
    ///
    /// Ranks 1 and 8 trade places, every piece changes sides, and so do the move and the castling rights.
    /// Any sound evaluation scores both positions identically from the mover's point of view.
    ///
    /// # Example
    /// ```
    /// # use newt::Position;
    /// let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w K - 3 20").unwrap();
    /// assert_eq!(pos.mirrored().to_fen(), "4k3/4p3/8/8/8/8/8/4K3 b k - 3 20");
    /// assert_eq!(pos.mirrored().mirrored(), pos);
    /// ```
    pub fn mirrored(&self) -> Self {
        Self {
            board: self.board.mirrored(),
            side_to_move: self.side_to_move.opponent(),
            castling_rights: self.castling_rights.swapped(),
            ep_square: self.ep_square.map(Square::flipped_rank),
            halfmove: self.halfmove,
            fullmove: self.fullmove,
        }
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Deref for Position {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl DerefMut for Position {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.board
    }
}

impl Default for Position {
    /// The standard starting position, with White to move.
    fn default() -> Self {
        Self {
            board: Board::default(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
        }
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placements = self.board.to_fen();
        let active_color = self.side_to_move.to_uci();
        let castling = self.castling_rights;

        let en_passant_target = if let Some(square) = self.ep_square {
            square.to_string()
        } else {
            String::from("-")
        };

        let halfmove = self.halfmove;
        let fullmove = self.fullmove;

        write!(
            f,
            "{placements} {active_color} {castling} {en_passant_target} {halfmove} {fullmove}"
        )
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let piece = self.piece_at(Square::new(file, rank));
                write!(f, " {}", piece.map(|p| p.to_uci()).unwrap_or('.'))?;
            }

            if rank == Rank::SEVEN {
                write!(f, "           FEN: {self}")?;
            } else if rank == Rank::SIX {
                write!(f, "          Side: {}", self.side_to_move)?;
            } else if rank == Rank::FIVE {
                write!(f, "      Castling: {}", self.castling_rights)?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}
