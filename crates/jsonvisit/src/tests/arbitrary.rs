use quickcheck::{Arbitrary, Gen};

use crate::{Map, Sequence, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteFloat(pub(crate) f64);

impl Arbitrary for FiniteFloat {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            let variants = if depth == 0 { 6 } else { 8 };
            match usize::arbitrary(g) % variants {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Int(i64::arbitrary(g)),
                3 => Value::Uint(u64::arbitrary(g)),
                4 => Value::Float(FiniteFloat::arbitrary(g).0),
                5 => Value::String(String::arbitrary(g)),
                6 => {
                    let len = usize::arbitrary(g) % 3;
                    let mut seq = Sequence::new();
                    for _ in 0..len {
                        seq.push(gen_val(g, depth - 1));
                    }
                    Value::Sequence(seq)
                }
                _ => {
                    let len = usize::arbitrary(g) % 3;
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Mapping(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        gen_val(g, depth)
    }
}
