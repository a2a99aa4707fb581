#[macro_export]
macro_rules! t {
    (now) => {{
        $crate::core::time::DateTime::now()
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::time::*;

    #[test]
    fn test_now() {
        let now = t!(now);
        assert!(DateTime::now().elapsed_since(now) < Duration::seconds(1));
    }
}
