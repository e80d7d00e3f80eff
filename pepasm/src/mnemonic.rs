use std::ops::BitOr;

use ahash::AHashMap;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// immediate
    I,
    /// direct
    D,
    /// indirect
    N,
    /// stack-relative
    S,
    /// stack-relative deferred
    SF,
    /// indexed
    X,
    /// stack-indexed
    SX,
    /// stack-indexed deferred
    SXF,
}

impl AddrMode {
    pub const ALL: [AddrMode; 8] = [
        AddrMode::I,
        AddrMode::D,
        AddrMode::N,
        AddrMode::S,
        AddrMode::SF,
        AddrMode::X,
        AddrMode::SX,
        AddrMode::SXF,
    ];

    pub const fn bit(self) -> u8 {
        match self {
            AddrMode::I => 1,
            AddrMode::D => 2,
            AddrMode::N => 4,
            AddrMode::S => 8,
            AddrMode::SF => 16,
            AddrMode::X => 32,
            AddrMode::SX => 64,
            AddrMode::SXF => 128,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AddrMode::I => "i",
            AddrMode::D => "d",
            AddrMode::N => "n",
            AddrMode::S => "s",
            AddrMode::SF => "sf",
            AddrMode::X => "x",
            AddrMode::SX => "sx",
            AddrMode::SXF => "sxf",
        }
    }

    /// Parses an addressing mode lexeme such as `,i` or `, SXF`.
    pub fn from_lexeme(text: &str) -> Option<Self> {
        let name = text.strip_prefix(',').unwrap_or(text).trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

/// Set of addressing modes, one bit per [`AddrMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddrModes(pub u8);

impl AddrModes {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0xFF);
    /// Every mode except immediate.
    pub const STORE: Self = Self(0xFF & !AddrMode::I.bit());
    pub const BRANCH: Self = Self(AddrMode::I.bit() | AddrMode::X.bit());

    pub const fn contains(self, mode: AddrMode) -> bool {
        self.0 & mode.bit() != 0
    }
}

impl BitOr<AddrMode> for AddrModes {
    type Output = Self;
    fn bitor(self, rhs: AddrMode) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl From<AddrMode> for AddrModes {
    fn from(mode: AddrMode) -> Self {
        Self(mode.bit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub unary: bool,
    pub modes: AddrModes,
    pub mode_required: bool,
}

impl Instruction {
    pub const fn unary(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            unary: true,
            modes: AddrModes::NONE,
            mode_required: false,
        }
    }
    pub const fn required(mnemonic: Mnemonic, modes: AddrModes) -> Self {
        Self {
            mnemonic,
            unary: false,
            modes,
            mode_required: true,
        }
    }
    /// Branch style: the mode defaults to immediate when omitted.
    pub const fn optional(mnemonic: Mnemonic, modes: AddrModes) -> Self {
        Self {
            mnemonic,
            unary: false,
            modes,
            mode_required: false,
        }
    }
}

macro_rules! mnemonics {
    ($($name:ident => $ctor:ident $(($modes:expr))?,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            $($name,)*
        }

        impl Mnemonic {
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$name,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Mnemonic::$name => stringify!($name),)*
                }
            }

            /// The Pep/8 encoding rules for this mnemonic.
            pub fn pep8(self) -> Instruction {
                match self {
                    $(Mnemonic::$name => Instruction::$ctor(Mnemonic::$name $(, $modes)?),)*
                }
            }
        }
    };
}

const NON_IMMEDIATE: AddrModes = AddrModes::STORE;
const STRO_MODES: AddrModes = AddrModes(AddrMode::D.bit() | AddrMode::N.bit() | AddrMode::SF.bit());

mnemonics! {
    STOP => unary,
    RETTR => unary,
    MOVSPA => unary,
    MOVFLGA => unary,
    BR => optional(AddrModes::BRANCH),
    BRLE => optional(AddrModes::BRANCH),
    BRLT => optional(AddrModes::BRANCH),
    BREQ => optional(AddrModes::BRANCH),
    BRNE => optional(AddrModes::BRANCH),
    BRGE => optional(AddrModes::BRANCH),
    BRGT => optional(AddrModes::BRANCH),
    BRV => optional(AddrModes::BRANCH),
    BRC => optional(AddrModes::BRANCH),
    CALL => optional(AddrModes::BRANCH),
    NOTA => unary,
    NOTX => unary,
    NEGA => unary,
    NEGX => unary,
    ASLA => unary,
    ASLX => unary,
    ASRA => unary,
    ASRX => unary,
    ROLA => unary,
    ROLX => unary,
    RORA => unary,
    RORX => unary,
    NOP0 => unary,
    NOP1 => unary,
    NOP2 => unary,
    NOP3 => unary,
    NOP => required(AddrModes(AddrMode::I.bit())),
    DECI => required(NON_IMMEDIATE),
    DECO => required(AddrModes::ALL),
    STRO => required(STRO_MODES),
    CHARI => required(NON_IMMEDIATE),
    CHARO => required(AddrModes::ALL),
    RET0 => unary,
    RET1 => unary,
    RET2 => unary,
    RET3 => unary,
    RET4 => unary,
    RET5 => unary,
    RET6 => unary,
    RET7 => unary,
    ADDSP => required(AddrModes::ALL),
    SUBSP => required(AddrModes::ALL),
    ADDA => required(AddrModes::ALL),
    ADDX => required(AddrModes::ALL),
    SUBA => required(AddrModes::ALL),
    SUBX => required(AddrModes::ALL),
    ANDA => required(AddrModes::ALL),
    ANDX => required(AddrModes::ALL),
    ORA => required(AddrModes::ALL),
    ORX => required(AddrModes::ALL),
    CPA => required(AddrModes::ALL),
    CPX => required(AddrModes::ALL),
    LDA => required(AddrModes::ALL),
    LDX => required(AddrModes::ALL),
    LDBYTEA => required(AddrModes::ALL),
    LDBYTEX => required(AddrModes::ALL),
    STA => required(NON_IMMEDIATE),
    STX => required(NON_IMMEDIATE),
    STBYTEA => required(NON_IMMEDIATE),
    STBYTEX => required(NON_IMMEDIATE),
}

/// Case-insensitive mnemonic lookup handed to the line parser.
#[derive(Debug, Clone)]
pub struct InstructionTable {
    map: AHashMap<Box<str>, Instruction>,
}

impl InstructionTable {
    pub fn empty() -> Self {
        Self {
            map: AHashMap::new(),
        }
    }

    pub fn pep8() -> Self {
        Mnemonic::ALL.iter().map(|m| m.pep8()).collect()
    }

    /// Registers `ins` under its mnemonic's name, replacing any previous rule.
    pub fn insert(&mut self, ins: Instruction) -> Option<Instruction> {
        self.map.insert(ins.mnemonic.name().into(), ins)
    }

    pub fn lookup(&self, name: &str) -> Option<Instruction> {
        self.map.get(name.to_ascii_uppercase().as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::pep8()
    }
}

impl FromIterator<Instruction> for InstructionTable {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut table = Self::empty();
        for ins in iter {
            table.insert(ins);
        }
        table
    }
}
