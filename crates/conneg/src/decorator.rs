//! Composition of handler decorators.
//!
//! Every selector is a [`HandlerDecorator`]: it takes the next handler and
//! returns a new handler wrapping it. Decorators are chained with
//! [`HandlerDecoratorExt::and_then`], where the decorator added last becomes the
//! outermost one and sees the request first.

pub trait HandlerDecorator<In> {
    type Output;

    fn decorate(&self, handler: In) -> Self::Output;
}

pub trait HandlerDecoratorExt: Sized {
    /// Decorates with `self` first, then wraps the result with `decorator`.
    fn and_then<D>(self, decorator: D) -> HandlerDecoratorComposer<Self, D> {
        HandlerDecoratorComposer::new(self, decorator)
    }

    /// Decorates with `decorator` first, then wraps the result with `self`.
    fn compose<D>(self, decorator: D) -> HandlerDecoratorComposer<D, Self> {
        HandlerDecoratorComposer::new(decorator, self)
    }
}

#[derive(Default, Copy, Clone, Debug)]
pub struct IdentityHandlerDecorator;

impl<In> HandlerDecorator<In> for IdentityHandlerDecorator {
    type Output = In;

    fn decorate(&self, handler: In) -> Self::Output {
        handler
    }
}

impl HandlerDecoratorExt for IdentityHandlerDecorator {}

#[derive(Debug, Clone)]
pub struct HandlerDecoratorComposer<D1, D2> {
    decorator_1: D1,
    decorator_2: D2,
}

impl<D1, D2> HandlerDecoratorComposer<D1, D2> {
    pub fn new(decorator_1: D1, decorator_2: D2) -> Self {
        HandlerDecoratorComposer { decorator_1, decorator_2 }
    }
}

impl<In, D1, D2> HandlerDecorator<In> for HandlerDecoratorComposer<D1, D2>
where
    D1: HandlerDecorator<In>,
    D2: HandlerDecorator<D1::Output>,
{
    type Output = D2::Output;

    fn decorate(&self, handler: In) -> Self::Output {
        let output_1 = self.decorator_1.decorate(handler);
        self.decorator_2.decorate(output_1)
    }
}

impl<D1, D2> HandlerDecoratorExt for HandlerDecoratorComposer<D1, D2> {}
