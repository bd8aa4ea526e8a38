macro_rules! each_bits {
  ($expr:expr) => {
    #[cfg(any(coverage, coverage_nightly, miri))]
    {
      $crate::utils::each_bits!(
        @impl $expr,
        4, 8,
      );
    }

    #[cfg(not(any(coverage, coverage_nightly, miri)))]
    {
      $crate::utils::each_bits!(
        @impl $expr,
        4, 5, 6, 7, 8, 10, 12,
      );
    }
  };
  (@impl $expr:expr, $($bits:expr),+ $(,)?) => {
    $(
      $crate::utils::each_bits!(@run $expr, $bits);
    )+
  };
  (@run $expr:expr, $bits:expr) => {{
    let bits: $crate::params::Bits = $crate::params::Bits::new($bits);
    $expr(bits);
  }};
}

pub(crate) use each_bits;
