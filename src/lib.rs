pub mod configuration;

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod curveerror;
        pub mod piecewisefunction {
            pub mod piecewisefunction;
            pub mod breakpointmerge;
            pub mod piecewisepolynomialmatrix;
        }
    }
    pub mod polynomial {
        pub mod polynomial;
    }
}
