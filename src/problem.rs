use crate::tier::{DifficultyTier, OperandRange, OperandRanges};
use rand::Rng;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// glyph shown on the LCD
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => 'x',
            Self::Div => '/',
        }
    }

    /// only defined for operand pairs the generator produces
    fn apply(&self, a: u32, b: u32) -> u32 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
        }
    }
}

/// One question. Only the generator builds these, so `answer` always agrees
/// with the operands: subtraction never goes negative and division is
/// always exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Problem {
    operand1: u32,
    operand2: u32,
    operator: Operator,
    answer: u32,
}

impl Problem {
    pub fn operand1(&self) -> u32 {
        self.operand1
    }

    pub fn operand2(&self) -> u32 {
        self.operand2
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn answer(&self) -> u32 {
        self.answer
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}=",
            self.operand1,
            self.operator.symbol(),
            self.operand2
        )
    }
}

/// draws random, well-formed problems
pub struct ProblemGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> ProblemGenerator<R> {
    pub fn new(rng: R) -> Self {
        ProblemGenerator { rng }
    }

    pub fn generate(&mut self, tier: DifficultyTier) -> Problem {
        self.generate_in(&tier.operand_ranges())
    }

    /// Pick an operator uniformly, then draw operands from its range. For
    /// `Sub` and `Div` only the second operand is redrawn, so the first
    /// number shown is always the larger one. Every range starts at 1, so
    /// `operand2 == 1` always satisfies both rejection rules.
    pub fn generate_in(&mut self, ranges: &OperandRanges) -> Problem {
        let operator = Operator::ALL[self.rng.gen_range(0..Operator::ALL.len())];
        let range = match operator {
            Operator::Add => &ranges.add,
            Operator::Sub => &ranges.sub,
            Operator::Mul => &ranges.mul,
            Operator::Div => &ranges.div,
        };
        let operand1 = self.draw(range);
        let mut operand2 = self.draw(range);
        match operator {
            Operator::Add | Operator::Mul => {}
            Operator::Sub => {
                while operand1 < operand2 {
                    operand2 = self.draw(range);
                }
            }
            Operator::Div => {
                while operand1 < operand2 || operand1 % operand2 != 0 {
                    operand2 = self.draw(range);
                }
            }
        }
        let problem = Problem {
            operand1,
            operand2,
            operator,
            answer: operator.apply(operand1, operand2),
        };
        log::debug!("generated {} (answer {})", problem, problem.answer);
        problem
    }

    fn draw(&mut self, range: &OperandRange) -> u32 {
        self.rng.gen_range(range.as_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn generator(seed: u64) -> ProblemGenerator<SmallRng> {
        ProblemGenerator::new(SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn test_ten_thousand_problems_are_well_formed() {
        let mut g = generator(0x5eed);
        for tier in DifficultyTier::ALL {
            let ranges = tier.operand_ranges();
            for _ in 0..10_000 {
                let p = g.generate(tier);
                let (a, b) = (p.operand1(), p.operand2());
                match p.operator() {
                    Operator::Add => {
                        assert!(ranges.add.contains(a) && ranges.add.contains(b));
                        assert_eq!(p.answer(), a + b);
                    }
                    Operator::Mul => {
                        assert!(ranges.mul.contains(a) && ranges.mul.contains(b));
                        assert_eq!(p.answer(), a * b);
                    }
                    Operator::Sub => {
                        assert!(ranges.sub.contains(a) && ranges.sub.contains(b));
                        assert!(a >= b);
                        assert_eq!(p.answer(), a - b);
                    }
                    Operator::Div => {
                        assert!(ranges.div.contains(a) && ranges.div.contains(b));
                        assert_ne!(b, 0);
                        assert_eq!(a % b, 0);
                        assert_eq!(p.answer(), a / b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_operator_shows_up() {
        let mut g = generator(7);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            let op = g.generate(DifficultyTier::Medium).operator();
            let idx = Operator::ALL.iter().position(|o| *o == op).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_easy_operands_within_one_to_hundred() {
        let mut g = generator(99);
        for _ in 0..1_000 {
            let p = g.generate(DifficultyTier::Easy);
            assert!((1..=100).contains(&p.operand1()));
            assert!((1..=100).contains(&p.operand2()));
        }
    }

    #[test]
    fn test_single_value_range_terminates() {
        let mut g = generator(3);
        let ranges = OperandRanges::uniform(OperandRange::new(4, 5).unwrap());
        for _ in 0..100 {
            let p = g.generate_in(&ranges);
            assert_eq!((p.operand1(), p.operand2()), (4, 4));
        }
    }

    #[test]
    fn test_display_format() {
        let p = Problem {
            operand1: 12,
            operand2: 3,
            operator: Operator::Mul,
            answer: 36,
        };
        assert_eq!(p.to_string(), "12x3=");
    }
}
