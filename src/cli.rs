use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// 使用するネットワーク ("mainnet", "testnet")
    #[clap(short, long, value_parser, default_value = "testnet")]
    pub network: String,

    /// 送金元 (UTXO の所有者、おつりの受取先) のアドレス
    #[clap(short, long, value_parser)]
    pub sender: String,

    /// 寄付の受取先アドレス
    #[clap(short, long, value_parser)]
    pub recipient: String,

    /// 送金額 (sats)
    #[clap(short, long, value_parser, allow_hyphen_values = true)]
    pub amount: i64,

    /// 設定JSONファイルへのパス (省略時は既定値)
    #[clap(short, long, value_parser)]
    pub config: Option<PathBuf>,

    /// 生成された base64 PSBT を保存するファイルへのパス
    #[clap(short, long, value_parser)]
    pub output_file: Option<PathBuf>,
}
