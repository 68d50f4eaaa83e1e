//! Callables whose parameters are supplied by the injector.

use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::Inject;

/// A callable whose every parameter implements [`Inject`].
///
/// Implemented for closures and functions of up to eight parameters. `Args`
/// is the tuple of parameter types and only serves to keep the impls apart.
pub trait InjectableFn<Args, R>: Send + Sync + 'static {
    /// Keys of the parameters, in declaration order.
    fn parameters() -> Vec<Key>;

    /// Calls the function with resolved arguments, in declaration order.
    ///
    /// Returns `None` if an argument is missing or of the wrong shape.
    fn call(&self, args: &[AnyArc]) -> Option<R>;
}

macro_rules! impl_injectable_fn {
    ($($arg:ident $value:ident),*) => {
        impl<Func, R, $($arg,)*> InjectableFn<($($arg,)*), R> for Func
        where
            Func: Fn($($arg),*) -> R + Send + Sync + 'static,
            $($arg: Inject,)*
        {
            fn parameters() -> Vec<Key> {
                vec![$($arg::key()),*]
            }

            #[allow(unused_variables, unused_mut)]
            fn call(&self, args: &[AnyArc]) -> Option<R> {
                let mut args = args.iter();
                $(let $value = $arg::from_resolved(args.next()?)?;)*
                Some((self)($($value),*))
            }
        }
    };
}

impl_injectable_fn!();
impl_injectable_fn!(A1 a1);
impl_injectable_fn!(A1 a1, A2 a2);
impl_injectable_fn!(A1 a1, A2 a2, A3 a3);
impl_injectable_fn!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_injectable_fn!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_injectable_fn!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_injectable_fn!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_injectable_fn!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn parameters_of<Args, R, F: InjectableFn<Args, R>>(_f: &F) -> Vec<Key> {
        F::parameters()
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let f = |a: Arc<u32>, b: Arc<String>| format!("{a}{b}");
        assert_eq!(parameters_of(&f), vec![Key::of::<u32>(), Key::of::<String>()]);
    }

    #[test]
    fn call_downcasts_arguments() {
        let f = |a: Arc<u32>, b: Arc<u32>| *a + *b;
        let args: Vec<AnyArc> = vec![Arc::new(Arc::new(2u32)) as AnyArc, Arc::new(Arc::new(3u32)) as AnyArc];
        assert_eq!(InjectableFn::call(&f, &args), Some(5));

        let wrong: Vec<AnyArc> = vec![Arc::new(Arc::new(2u32)) as AnyArc, Arc::new(7u8) as AnyArc];
        assert_eq!(InjectableFn::call(&f, &wrong), None);
        assert_eq!(InjectableFn::call(&f, &args[..1]), None);
    }
}
