use std::fmt;

/// Straight-line instructions. Counts are run lengths and always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    MoveLeft(usize),
    MoveRight(usize),
    Add(usize),
    Subtract(usize),
    Input,
    Output,
}

/// A pre-tested loop: the body runs while the current cell is non-zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub body: Vec<Command>,
}

impl Loop {
    pub fn new(body: Vec<Command>) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Primitive(Primitive),
    Loop(Loop),
}

impl From<Primitive> for Command {
    fn from(primitive: Primitive) -> Self {
        Command::Primitive(primitive)
    }
}

impl From<Loop> for Command {
    fn from(l: Loop) -> Self {
        Command::Loop(l)
    }
}

/// Complete program AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub commands: Vec<Command>,
}

impl Program {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Number of loops at any depth
    pub fn loop_count(&self) -> usize {
        fn count(commands: &[Command]) -> usize {
            commands
                .iter()
                .map(|command| match command {
                    Command::Primitive(_) => 0,
                    Command::Loop(l) => 1 + count(&l.body),
                })
                .sum()
        }
        count(&self.commands)
    }

    /// Deepest loop nesting, 0 for a program without loops
    pub fn max_depth(&self) -> usize {
        fn depth(commands: &[Command]) -> usize {
            commands
                .iter()
                .map(|command| match command {
                    Command::Primitive(_) => 0,
                    Command::Loop(l) => 1 + depth(&l.body),
                })
                .max()
                .unwrap_or(0)
        }
        depth(&self.commands)
    }
}

fn write_commands(f: &mut fmt::Formatter, commands: &[Command]) -> fmt::Result {
    for (i, command) in commands.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{command}")?;
    }
    Ok(())
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Primitive::MoveLeft(n) => write!(f, "MoveLeft[{n}]"),
            Primitive::MoveRight(n) => write!(f, "MoveRight[{n}]"),
            Primitive::Add(n) => write!(f, "Add[{n}]"),
            Primitive::Subtract(n) => write!(f, "Subtract[{n}]"),
            Primitive::Input => write!(f, "Input"),
            Primitive::Output => write!(f, "Output"),
        }
    }
}

impl fmt::Display for Loop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Loop[")?;
        write_commands(f, &self.body)?;
        write!(f, "]")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Primitive(p) => p.fmt(f),
            Command::Loop(l) => l.fmt(f),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Program[")?;
        write_commands(f, &self.commands)?;
        write!(f, "]")
    }
}
