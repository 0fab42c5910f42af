pub use super::Value;

#[macro_export]
macro_rules! val {

    (str $it:expr) => {
        $crate::Value::Str($it.into())
    };

    (int $it:expr) => {
        $crate::Value::Int($it)
    };

    (bool $it:literal) => {
        $crate::Value::Bool($it)
    };

    (nil) => {
        $crate::Value::Nil
    };

    (list $($it:expr),* $(,)?) => {
        $crate::Value::List([$($it),*].into_iter().collect())
    };

    (map $($k:literal => $v:expr),* $(,)?) => {{
        let map = $crate::Map::new();
        $( map.set($k, $v); )*
        $crate::Value::Map(map)
    }};

    (fn $name:literal, $f:expr) => {
        $crate::Value::Func($crate::Func::new($name, $f))
    };
}
